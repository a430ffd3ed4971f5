pub mod hugging_face_error_response;
