//! Image record storage for the Image Vault backend
//!
//! This crate provides the image-record store used by the backend: the record
//! types, the `ImageRecordStore` trait the handlers depend on, and a
//! `DynamoDB`-backed implementation. An in-memory implementation for tests
//! lives behind the `test-utils` feature.

pub mod image_record;
