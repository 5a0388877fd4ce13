use crate::{html::Html, rules::ControlId, rules::Rules};

/// The part of a form control that doesn't depend on what kind of value it holds: its name,
/// label, rules, and the `<input>` element it renders to.
///
/// Typed controls like [`DatePicker`](crate::DatePicker) wrap one of these and add their own value
/// handling on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseControl {
    id: ControlId,
    label: String,
    rules: Rules,
    disabled: bool,
    attrs: Vec<(String, String)>,
}

impl BaseControl {
    /// Creates a control named `name`, labelled with its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            id: ControlId::new(name),
            rules: Rules::new(),
            disabled: false,
            attrs: Vec::new(),
        }
    }

    /// Returns the id rules use to refer to this control.
    pub fn id(&self) -> &ControlId {
        &self.id
    }

    /// Returns the control's name.
    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the HTML id of the rendered element.
    pub fn html_id(&self) -> String {
        format!("frm-{}", self.id)
    }

    /// Returns the label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Sets the label.
    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Returns the rules.
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Returns the rules for changing.
    pub fn rules_mut(&mut self) -> &mut Rules {
        &mut self.rules
    }

    /// Returns true if the control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables or enables the control.
    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.disabled = disabled;
        self
    }

    /// Sets an extra attribute copied onto the rendered element.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((key, value)),
        }
        self
    }

    /// Builds the element: a text `<input>` with name, id, `required` and `disabled` set from the
    /// control, followed by any extra attributes.
    pub fn control(&self) -> Html {
        let mut el = Html::el("input");
        el.set("type", "text")
            .set("name", self.name())
            .set("id", self.html_id())
            .set_flag("required", self.rules.is_required())
            .set_flag("disabled", self.disabled);
        for (key, value) in &self.attrs {
            el.set(key, value.as_str());
        }
        el
    }
}
