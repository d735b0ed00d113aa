//! Default system prompts for the agent graph
//!
//! The placeholders (`{retrieved_docs}`, `{queries}`, `{system_time}`) are
//! filled in by the graph; this crate only carries the templates

/// System prompt used when generating the final answer
pub const RESPONSE_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Answer the user's questions based on the retrieved documents.

{retrieved_docs}

System time: {system_time}";

/// System prompt used when refining the user's question into a search query
pub const QUERY_SYSTEM_PROMPT: &str = "Generate search queries to retrieve documents that may help answer the user's question. Previously, you made the following queries:

<previous_queries/>
{queries}
</previous_queries>

System time: {system_time}";
