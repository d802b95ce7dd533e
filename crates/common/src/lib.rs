//! Shared model for the rider KYC front end
//!
//! Field descriptors, typed form state, file attachments and driver records.
//! Nothing in here touches the network.

pub mod attachment;
pub mod error;
pub mod fields;
pub mod form;
pub mod record;

pub use attachment::{Attachment, AttachmentSlot};
pub use error::{Error, Result, GENERIC_FAILURE};
pub use fields::{
    damage_report_schema, registration_schema, ChoiceDescriptor, ChoiceOption, FieldDescriptor,
    FieldSpec, FileFieldDescriptor, FormSchema, DEFAULT_MAX_FILE_SIZE,
};
pub use form::{FieldError, FieldValue, FormState, PartValue, PayloadPart};
pub use record::{normalize_records, DriverRecord, FILE_FIELDS};
