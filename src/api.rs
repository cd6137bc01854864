pub mod apples_to_apples;
