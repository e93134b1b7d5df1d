// Resumes: uploaded files stored in the document store, with text extracted
// at upload time.

pub mod handlers;
