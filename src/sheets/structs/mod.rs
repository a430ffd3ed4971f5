pub mod drive_files_response;
pub mod spreadsheet_response;
pub mod values_response;
