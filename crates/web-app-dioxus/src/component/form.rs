use dioxus::prelude::*;

#[component]
pub fn InputField(
    label: Option<String>,
    help: Option<String>,
    left_icon: Option<Element>,
    r#type: Option<String>,
    inputmode: Option<String>,
    min: Option<String>,
    value: String,
    error: Option<String>,
    has_changed: bool,
    is_disabled: Option<bool>,
    oninput: EventHandler<FormEvent>,
) -> Element {
    let error = error.and_then(|error| if error.is_empty() { None } else { Some(error) });
    let has_error = error.is_some();
    rsx! {
        div {
            class: "field",
            if let Some(label) = label { label { class: "label", "{label}" } }
            div {
                class: "control",
                class: if left_icon.is_some() { "has-icons-left" },
                input {
                    class: "input",
                    class: if has_error { "is-danger" },
                    class: if has_changed { "is-info" },
                    disabled: if let Some(is_disabled) = is_disabled { is_disabled },
                    r#type: if let Some(r#type) = r#type { r#type } else { "text" },
                    inputmode: if let Some(inputmode) = inputmode { inputmode },
                    min: if let Some(min) = min { min },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
                if let Some(ref left_icon) = left_icon {
                    span {
                        class: "icon is-left",
                        {left_icon}
                    }
                }
            }
            if let Some(ref error) = error {
                p { class: "help is-danger", "{error}" }
            } else if let Some(ref help) = help {
                p { class: "help", "{help}" }
            }
        }
    }
}

#[component]
pub fn TextAreaField(
    label: String,
    value: String,
    has_changed: bool,
    oninput: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label { class: "label", "{label}" }
            div {
                class: "control",
                textarea {
                    class: "textarea",
                    class: if has_changed { "is-info" },
                    value: "{value}",
                    oninput: move |evt| oninput.call(evt),
                }
            }
        }
    }
}

#[component]
pub fn SelectField(
    label: String,
    options: Vec<Element>,
    has_changed: bool,
    is_disabled: Option<bool>,
    onchange: EventHandler<FormEvent>,
) -> Element {
    rsx! {
        div {
            class: "field",
            label { class: "label", "{label}" }
            div {
                class: "control",
                div {
                    class: "select is-fullwidth",
                    select {
                        class: if has_changed { "has-text-info" },
                        disabled: is_disabled.unwrap_or_default(),
                        onchange,
                        for option in options {
                            {option}
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SelectOption(text: String, value: String, selected: bool) -> Element {
    rsx! {
        option {
            selected,
            value,
            "{text}"
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue<T> {
    pub input: String,
    pub validated: Result<T, String>,
    pub orig: String,
}

impl<T> Default for FieldValue<T> {
    fn default() -> Self {
        Self {
            input: String::new(),
            validated: Err(String::new()),
            orig: String::new(),
        }
    }
}

impl<T: ToString> FieldValue<T> {
    pub fn new(value: T) -> Self {
        let value_string = value.to_string();
        Self {
            input: value_string.clone(),
            validated: Ok(value),
            orig: value_string,
        }
    }
}

impl<T: ToString> FieldValue<Option<T>> {
    pub fn from_option(value: Option<T>) -> Self {
        if let Some(value) = value {
            let value_string = value.to_string();
            Self {
                input: value_string.clone(),
                validated: Ok(Some(value)),
                orig: value_string,
            }
        } else {
            Self {
                input: String::new(),
                validated: Ok(None),
                orig: String::new(),
            }
        }
    }
}

impl<T> FieldValue<T> {
    /// Replace the input and validate it, keeping the original value.
    pub fn update(&mut self, input: String, validate: impl FnOnce(&str) -> Result<T, String>) {
        self.validated = validate(&input);
        self.input = input;
    }
}

impl FieldValue<()> {
    pub fn has_valid_changes(values: &[&dyn FieldValueState]) -> bool {
        values.iter().any(|v| v.changed()) && values.iter().all(|v| v.valid())
    }
}

pub trait FieldValueState {
    fn valid(&self) -> bool;
    fn changed(&self) -> bool;
}

impl<T> FieldValueState for FieldValue<T> {
    fn valid(&self) -> bool {
        self.validated.is_ok()
    }

    fn changed(&self) -> bool {
        self.input.trim() != self.orig.trim()
    }
}

pub fn validate_required(input: &str) -> Result<String, String> {
    let input = input.trim();
    if input.is_empty() {
        Err("Required".to_string())
    } else {
        Ok(input.to_string())
    }
}

pub fn validate_price(input: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(price) if price.is_finite() && price > 0.0 => Ok(price),
        Ok(_) => Err("Price must be greater than 0".to_string()),
        Err(_) => Err("Invalid price".to_string()),
    }
}

/// An empty input means that the weight is unknown.
pub fn validate_weight(input: &str) -> Result<Option<u32>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<u32>()
        .map(|w| if w == 0 { None } else { Some(w) })
        .map_err(|_| "Weight must be a whole number of grams".to_string())
}

/// Named tags that can be switched on and off.
pub struct TagSelection {
    pub tags: Vec<(String, bool)>,
}

impl TagSelection {
    pub fn new(names: impl IntoIterator<Item = String>, selected: &[String]) -> Self {
        Self {
            tags: names
                .into_iter()
                .map(|name| {
                    let is_selected = selected.contains(&name);
                    (name, is_selected)
                })
                .collect(),
        }
    }

    pub fn selected(&self) -> Vec<String> {
        self.tags
            .iter()
            .filter(|(_, selected)| *selected)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[component]
pub fn TagSelectionField(label: String, selection: Signal<TagSelection>) -> Element {
    let tags = selection
        .read()
        .tags
        .iter()
        .enumerate()
        .map(|(i, (name, selected))| {
            rsx! {
                span {
                    class: "tag is-hoverable is-clickable",
                    class: if *selected { "is-link" },
                    onclick: move |_| {
                        let s = selection.read().tags[i].1;
                        selection.write().tags[i].1 = !s;
                    },
                    "{name}"
                }
            }
        })
        .collect::<Vec<_>>();
    rsx! {
        div {
            class: "field",
            label { class: "label", "{label}" }
            div {
                class: "tags",
                for tag in tags {
                    {tag}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_field_value_update() {
        let mut value = FieldValue::new(1.0);
        assert!(!value.changed());
        value.update("abc".to_string(), validate_price);
        assert!(value.changed());
        assert!(!value.valid());
        value.update(" 1 ".to_string(), validate_price);
        assert!(!value.changed());
        assert_eq!(value.validated, Ok(1.0));
    }

    #[test]
    fn test_has_valid_changes() {
        let unchanged = FieldValue::new("a".to_string());
        let mut changed = FieldValue::new("b".to_string());
        changed.update("c".to_string(), validate_required);
        assert!(FieldValue::has_valid_changes(&[&unchanged as &dyn FieldValueState, &changed]));
        changed.update(String::new(), validate_required);
        assert!(!FieldValue::has_valid_changes(&[&unchanged as &dyn FieldValueState, &changed]));
    }

    #[test]
    fn test_validate_weight() {
        assert_eq!(validate_weight(""), Ok(None));
        assert_eq!(validate_weight("0"), Ok(None));
        assert_eq!(validate_weight("250"), Ok(Some(250)));
        assert!(validate_weight("2.5").is_err());
    }

    #[test]
    fn test_tag_selection() {
        let selection = TagSelection::new(
            ["Books".to_string(), "Food".to_string()],
            &["Food".to_string()],
        );
        assert_eq!(selection.selected(), vec!["Food".to_string()]);
    }
}
