//! Selectable form fields with a free-text "Outro" override.

use serde::{Deserialize, Serialize};

/// A predefined option of a selectable form field.
pub trait Choice: Sized + 'static {
    /// Text shown to the user and printed on documents.
    fn label(&self) -> &'static str;

    /// Every predefined option, in display order.
    fn options() -> &'static [Self];

    /// Option whose label matches `text`, ignoring case and surrounding
    /// whitespace.
    fn from_label(text: &str) -> Option<&'static Self> {
        let text = text.trim().to_lowercase();
        Self::options()
            .iter()
            .find(|option| option.label().to_lowercase() == text)
    }
}

/// Value of a selectable field: one of the predefined options, or the
/// free text typed after choosing "Outro".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    Predefined(T),
    Custom(String),
}

impl<T: Choice> Selection<T> {
    /// Display label. A custom value is trimmed; blank custom text yields "".
    pub fn label(&self) -> String {
        match self {
            Selection::Predefined(value) => value.label().to_string(),
            Selection::Custom(text) => text.trim().to_string(),
        }
    }

    /// The predefined option, if one was chosen.
    pub fn predefined(&self) -> Option<&T> {
        match self {
            Selection::Predefined(value) => Some(value),
            Selection::Custom(_) => None,
        }
    }

    /// True when the field carries no printable text.
    pub fn is_blank(&self) -> bool {
        self.label().is_empty()
    }
}

impl<T: Choice + Clone> Selection<T> {
    /// Map typed text to a selection: a predefined option when the text
    /// matches one of their labels, custom text otherwise. Blank text
    /// yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(match T::from_label(text) {
            Some(option) => Selection::Predefined(option.clone()),
            None => Selection::Custom(text.to_string()),
        })
    }
}

impl<T> From<T> for Selection<T> {
    fn from(value: T) -> Self {
        Selection::Predefined(value)
    }
}

/// Label of an optional selection, "" when unset.
pub fn label_of<T: Choice>(selection: &Option<Selection<T>>) -> String {
    selection.as_ref().map(Selection::label).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Color;

    impl Choice for Color {
        fn label(&self) -> &'static str {
            "Azul"
        }

        fn options() -> &'static [Self] {
            &[Color]
        }
    }

    #[test]
    fn test_predefined_label() {
        let selection: Selection<Color> = Color.into();
        assert_eq!(selection.label(), "Azul");
        assert!(selection.predefined().is_some());
    }

    #[test]
    fn test_custom_label_is_trimmed() {
        let selection: Selection<Color> = Selection::Custom("  Verde ".into());
        assert_eq!(selection.label(), "Verde");
        assert!(selection.predefined().is_none());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Selection::<Color>::parse(" azul "), Some(Selection::Predefined(Color)));
        assert_eq!(
            Selection::<Color>::parse("Verde"),
            Some(Selection::Custom("Verde".into()))
        );
        assert_eq!(Selection::<Color>::parse("  "), None);
    }

    #[test]
    fn test_blank_custom() {
        let selection: Selection<Color> = Selection::Custom("   ".into());
        assert!(selection.is_blank());
        assert_eq!(label_of::<Color>(&None), "");
    }
}
