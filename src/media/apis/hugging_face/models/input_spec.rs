use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct InputSpec<'a> {
    pub inputs: &'a str,
}
