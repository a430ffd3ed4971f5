pub mod prompt_record;
