/// One or more identifiers (stations or parameter codes) for a query.
///
/// A single string is always one identifier; it is never split into characters.
///
/// # Examples
///
/// ```
/// use lvmeteo::Selection;
///
/// assert_eq!(Selection::from("RIGASLU").into_vec(), vec!["RIGASLU"]);
/// assert_eq!(
///     Selection::from(["HTDRY", "HATMN"]).into_vec(),
///     vec!["HTDRY", "HATMN"]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    One(String),
    Many(Vec<String>),
}

impl Selection {
    /// Resolves the selection into an ordered list, dropping blank entries.
    pub fn into_vec(self) -> Vec<String> {
        let values = match self {
            Selection::One(value) => vec![value],
            Selection::Many(values) => values,
        };
        values
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .collect()
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::One(value.to_string())
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        Selection::One(value)
    }
}

impl From<&String> for Selection {
    fn from(value: &String) -> Self {
        Selection::One(value.clone())
    }
}

impl From<Vec<String>> for Selection {
    fn from(values: Vec<String>) -> Self {
        Selection::Many(values)
    }
}

impl From<Vec<&str>> for Selection {
    fn from(values: Vec<&str>) -> Self {
        Selection::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for Selection {
    fn from(values: &[&str]) -> Self {
        Selection::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl From<&[String]> for Selection {
    fn from(values: &[String]) -> Self {
        Selection::Many(values.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Selection {
    fn from(values: [&str; N]) -> Self {
        Selection::Many(values.iter().map(|v| v.to_string()).collect())
    }
}
