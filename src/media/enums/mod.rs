pub mod generation_result;
