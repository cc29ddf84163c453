// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Switch builder: a [`Checkbox`] whose trigger always has `role="switch"`.

use understory_dom::{Document, NodeId};
use understory_effect::{Effect, ElementBuilder};

use crate::checkbox::{Checkbox, CheckboxPatch, CheckboxProps, checkbox_trigger, trigger_attributes};

/// Builder for the switch trigger. [`CheckboxProps::role`] is ignored.
pub fn switch_trigger() -> ElementBuilder<CheckboxProps> {
    checkbox_trigger().attributes(|p: &CheckboxProps| trigger_attributes(p).with("role", "switch"))
}

/// A live switch.
#[derive(Debug)]
pub struct Switch(Checkbox);

impl Switch {
    /// Attach the trigger to `trigger` and the hidden input to `input`.
    pub fn new(doc: &Document, trigger: NodeId, input: NodeId, props: CheckboxProps) -> Self {
        Self(Checkbox::with_trigger(
            doc,
            &switch_trigger(),
            trigger,
            input,
            props,
        ))
    }

    /// The underlying trigger and hidden input.
    pub fn checkbox(&self) -> &Checkbox {
        &self.0
    }
}

impl Effect for Switch {
    type Props = CheckboxProps;

    fn update(&mut self, partial: CheckboxPatch) {
        self.0.update(partial);
    }

    fn destroy(&mut self) {
        self.0.destroy();
    }
}
