//! Item CRUD on `QueueDb`, split into read and write halves.

mod read;
mod write;
