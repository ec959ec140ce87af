// Résumé extraction: document decoding, contact fields, section scanning.
// Produces the StructuredResume every other module consumes.

pub mod contact;
pub mod decode;
pub mod handlers;
pub mod parser;
