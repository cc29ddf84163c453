// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Checkbox builder: a button-like trigger plus a hidden form input.
//!
//! The trigger carries the ARIA state and toggles through
//! [`CheckboxProps::on_change`] on click, `Enter` or `Space`. It never flips
//! `checked` itself: the owner decides and feeds the new value back through
//! [`Effect::update`]. Toggle handlers read the current merged props, so a
//! click after an update reports the inverse of the updated value.
//!
//! The hidden input mirrors the state for native form submission.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use understory_dom::{Document, Event, EventType, NodeId};
use understory_effect::{
    Attributes, Effect, EffectSet, Element, ElementBuilder, ListenerOptions, Patch, on,
};

use crate::EventHandler;
use crate::keydown::{Keydown, KeydownProps};

/// Callback receiving the requested `checked` value.
pub type ChangeHandler = Rc<dyn Fn(bool)>;

/// Props shared by the trigger and the hidden input.
#[derive(Clone, Default)]
pub struct CheckboxProps {
    /// Current checked state.
    pub checked: bool,
    /// Disables both elements; toggling is suppressed.
    pub disabled: bool,
    /// Marks the field as required.
    pub required: bool,
    /// Called with `!checked` when the trigger is activated.
    pub on_change: Option<ChangeHandler>,
    /// Trigger role; `checkbox` when unset or empty.
    pub role: Option<String>,
    /// Form field name.
    pub name: String,
    /// Form field value.
    pub value: String,
}

impl fmt::Debug for CheckboxProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxProps")
            .field("checked", &self.checked)
            .field("disabled", &self.disabled)
            .field("required", &self.required)
            .field("has_on_change", &self.on_change.is_some())
            .field("role", &self.role)
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl CheckboxProps {
    /// Unchecked props for the form field `name` with `value`.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Set `checked`.
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Set `disabled`.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set `required`.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the change callback.
    pub fn on_change(mut self, f: impl Fn(bool) + 'static) -> Self {
        self.on_change = Some(Rc::new(f));
        self
    }

    /// Override the trigger role.
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Partial [`CheckboxProps`]; `None` keeps the current value.
#[derive(Clone, Default)]
pub struct CheckboxPatch {
    /// New checked state.
    pub checked: Option<bool>,
    /// New disabled flag.
    pub disabled: Option<bool>,
    /// New required flag.
    pub required: Option<bool>,
    /// New change callback.
    pub on_change: Option<Option<ChangeHandler>>,
    /// New role.
    pub role: Option<Option<String>>,
    /// New field name.
    pub name: Option<String>,
    /// New field value.
    pub value: Option<String>,
}

impl fmt::Debug for CheckboxPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxPatch")
            .field("checked", &self.checked)
            .field("disabled", &self.disabled)
            .field("required", &self.required)
            .field("on_change", &self.on_change.as_ref().map(|h| h.is_some()))
            .field("role", &self.role)
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

impl From<CheckboxProps> for CheckboxPatch {
    fn from(p: CheckboxProps) -> Self {
        Self {
            checked: Some(p.checked),
            disabled: Some(p.disabled),
            required: Some(p.required),
            on_change: Some(p.on_change),
            role: Some(p.role),
            name: Some(p.name),
            value: Some(p.value),
        }
    }
}

impl Patch for CheckboxProps {
    type Partial = CheckboxPatch;

    fn merge(&mut self, p: CheckboxPatch) {
        if let Some(checked) = p.checked {
            self.checked = checked;
        }
        if let Some(disabled) = p.disabled {
            self.disabled = disabled;
        }
        if let Some(required) = p.required {
            self.required = required;
        }
        if let Some(on_change) = p.on_change {
            self.on_change = on_change;
        }
        if let Some(role) = p.role {
            self.role = role;
        }
        if let Some(name) = p.name {
            self.name = name;
        }
        if let Some(value) = p.value {
            self.value = value;
        }
    }
}

/// Trigger attributes for `props`.
pub fn trigger_attributes(p: &CheckboxProps) -> Attributes {
    let role = p.role.as_deref().filter(|r| !r.is_empty());
    Attributes::new()
        .with("data-state", if p.checked { "checked" } else { "unchecked" })
        .with("data-disabled", p.disabled.then_some("true"))
        .with("disabled", p.disabled.then_some(true))
        .with("type", "button")
        .with("role", role.unwrap_or("checkbox"))
        .with("aria-checked", p.checked)
        .with("aria-required", p.required.then_some("true"))
}

/// Hidden input attributes for `props`.
pub fn hidden_input_attributes(p: &CheckboxProps) -> Attributes {
    Attributes::new()
        .with("type", "checkbox")
        .with("aria-hidden", "true")
        .with("tabindex", -1_i32)
        .with("name", p.name.as_str())
        .with("value", p.value.as_str())
        .with("checked", p.checked.then_some(true))
        .with("required", p.required.then_some(true))
        .with("disabled", p.disabled.then_some(true))
}

/// Click and keyboard toggling on the trigger.
struct Toggle {
    props: Rc<RefCell<CheckboxProps>>,
    listeners: EffectSet,
}

impl Toggle {
    fn new(doc: &Document, node: NodeId, props: &CheckboxProps) -> Self {
        let current = Rc::new(RefCell::new(props.clone()));
        let toggle: Rc<dyn Fn()> = {
            let current = current.clone();
            Rc::new(move || {
                let (next, on_change) = {
                    let p = current.borrow();
                    if p.disabled {
                        return;
                    }
                    (!p.checked, p.on_change.clone())
                };
                if let Some(on_change) = on_change {
                    on_change(next);
                }
            })
        };

        let mut listeners = EffectSet::new();
        let on_click = toggle.clone();
        listeners.push_subscription(on(
            doc,
            node,
            EventType::Click,
            ListenerOptions::BUBBLE,
            move |_| on_click(),
        ));
        let on_key: EventHandler = Rc::new(move |e: &Event| {
            e.prevent_default();
            toggle();
        });
        let mut keys = KeydownProps::new();
        keys.handlers.insert("Enter".into(), on_key.clone());
        keys.handlers.insert("Space".into(), on_key);
        listeners.push_effect(Keydown::new(doc, node, keys));

        Self {
            props: current,
            listeners,
        }
    }
}

impl Effect for Toggle {
    type Props = CheckboxProps;

    fn update(&mut self, partial: CheckboxPatch) {
        self.props.borrow_mut().merge(partial);
    }

    fn destroy(&mut self) {
        self.listeners.destroy();
    }
}

/// Builder for the checkbox trigger.
pub fn checkbox_trigger() -> ElementBuilder<CheckboxProps> {
    ElementBuilder::new()
        .attributes(trigger_attributes)
        .effect(Toggle::new)
}

/// Builder for the hidden form input.
pub fn hidden_input() -> ElementBuilder<CheckboxProps> {
    ElementBuilder::new().attributes(hidden_input_attributes)
}

/// A live checkbox: trigger and hidden input driven by the same props.
#[derive(Debug)]
pub struct Checkbox {
    /// The trigger element.
    pub trigger: Element<CheckboxProps>,
    /// The hidden form input.
    pub hidden_input: Element<CheckboxProps>,
}

impl Checkbox {
    /// Attach the trigger to `trigger` and the hidden input to `input`.
    pub fn new(doc: &Document, trigger: NodeId, input: NodeId, props: CheckboxProps) -> Self {
        Self::with_trigger(doc, &checkbox_trigger(), trigger, input, props)
    }

    pub(crate) fn with_trigger(
        doc: &Document,
        builder: &ElementBuilder<CheckboxProps>,
        trigger: NodeId,
        input: NodeId,
        props: CheckboxProps,
    ) -> Self {
        Self {
            trigger: builder.attach(doc, trigger, props.clone()),
            hidden_input: hidden_input().attach(doc, input, props),
        }
    }
}

impl Effect for Checkbox {
    type Props = CheckboxProps;

    fn update(&mut self, partial: CheckboxPatch) {
        self.trigger.update(partial.clone());
        self.hidden_input.update(partial);
    }

    fn destroy(&mut self) {
        self.trigger.destroy();
        self.hidden_input.destroy();
    }
}
