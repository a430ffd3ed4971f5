use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DriveFilesResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}
