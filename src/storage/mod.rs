pub mod photo_store;
