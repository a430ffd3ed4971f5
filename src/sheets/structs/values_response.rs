use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ValuesResponse {
    // omitted by the api when the range is empty
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

impl ValuesResponse {
    pub fn into_first(self) -> Vec<String> {
        self.values.into_iter().next().unwrap_or_default()
    }
}
