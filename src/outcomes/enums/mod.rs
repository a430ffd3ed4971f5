pub mod run_status;
