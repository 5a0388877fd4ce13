use core::fmt::{self, Display};

/// A void HTML element with an ordered attribute bag, enough to describe a form `<input>`.
///
/// Attributes keep their insertion order when rendered. Boolean attributes are stored with an
/// empty value and rendered bare (`required`, not `required=""`).
///
/// ```
/// use datepicker::Html;
///
/// let mut input = Html::el("input");
/// input.set("type", "text").set("name", "from").set_flag("required", true);
/// assert_eq!(r#"<input type="text" name="from" required>"#, input.to_string());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Html {
    name: String,
    attrs: Vec<(String, Option<String>)>,
}

impl Html {
    /// Creates an element with no attributes.
    pub fn el(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Returns the element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of attribute `key`. Boolean attributes that are set return `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    /// Sets attribute `key` to `value`, replacing it in place if it exists.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.put(key, Some(value.into()))
    }

    /// Sets or removes boolean attribute `key`.
    pub fn set_flag(&mut self, key: &str, on: bool) -> &mut Self {
        if on {
            self.put(key, None)
        } else {
            self.remove(key)
        }
    }

    /// Removes attribute `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.attrs.retain(|(name, _)| name != key);
        self
    }

    /// Adds `token` to the space-separated `class` attribute unless it's already one of its tokens.
    pub fn add_class(&mut self, token: &str) -> &mut Self {
        let class = match self.get("class") {
            Some(class) if class.split_whitespace().any(|t| t == token) => None,
            Some(class) if !class.trim().is_empty() => {
                Some(format!("{} {}", class.trim_end(), token))
            }
            _ => Some(token.to_owned()),
        };
        match class {
            Some(class) => self.set("class", class),
            None => self,
        }
    }

    /// Returns the attributes in order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    fn put(&mut self, key: &str, value: Option<String>) -> &mut Self {
        match self.attrs.iter_mut().find(|(name, _)| name == key) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((key.to_owned(), value)),
        }
        self
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Display for Html {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attrs {
            match value {
                Some(value) => write!(f, " {}=\"{}\"", name, escape_attr(value))?,
                None => write!(f, " {}", name)?,
            }
        }
        f.write_str(">")
    }
}
