mod conversation;
mod repo;
mod tool;

pub use conversation::{Conversation, Role, Segment, Turn};
pub use repo::{
    Credential, EntryKind, License, MetadataFetch, RepoMetadata, RepoRef, RepoTree, TreeEntry,
};
pub use tool::{ParameterSpec, ToolCallRequest, ToolCallResult, ToolDeclaration, ToolOutcome};
