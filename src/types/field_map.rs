/// Ordered, bidirectional mapping between friendly column names and the column
/// names used by the datastore.
///
/// # Examples
///
/// ```
/// use lvmeteo::FieldMap;
///
/// let map = FieldMap::new([("station_id", "STATION_ID"), ("value", "VALUE")]);
/// assert_eq!(map.api_name("value"), Some("VALUE"));
/// assert_eq!(map.friendly_name("STATION_ID"), Some("station_id"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    pairs: Vec<(String, String)>,
}

impl FieldMap {
    /// Builds a map from `(friendly, api)` pairs, in declaration order.
    ///
    /// A later pair with an already used friendly name replaces the earlier one.
    pub fn new<I, F, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, A)>,
        F: Into<String>,
        A: Into<String>,
    {
        let mut map = FieldMap { pairs: Vec::new() };
        for (friendly, api) in pairs {
            map.insert(friendly, api);
        }
        map
    }

    pub fn insert(&mut self, friendly: impl Into<String>, api: impl Into<String>) {
        let friendly = friendly.into();
        let api = api.into();
        match self.pairs.iter_mut().find(|(f, _)| *f == friendly) {
            Some(pair) => pair.1 = api,
            None => self.pairs.push((friendly, api)),
        }
    }

    pub fn api_name(&self, friendly: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(f, _)| f == friendly)
            .map(|(_, a)| a.as_str())
    }

    pub fn friendly_name(&self, api: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, a)| a == api)
            .map(|(f, _)| f.as_str())
    }

    pub fn friendly_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(f, _)| f.as_str())
    }

    pub fn api_names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(_, a)| a.as_str())
    }

    /// `(friendly, api)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(f, a)| (f.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<F: Into<String>, A: Into<String>> FromIterator<(F, A)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (F, A)>>(iter: T) -> Self {
        FieldMap::new(iter)
    }
}
