//! Classification prompt assembly.

use atlas_core::models::ChunkPayload;

/// Build the classifier prompt from both chunk payloads.
///
/// Carries both texts, both key sets, and both creation times so the model
/// can judge duplication vs. iteration vs. convergence and pick a survivor.
pub fn build_classification_prompt(first: &ChunkPayload, second: &ChunkPayload) -> String {
    format!(
        "Two knowledge chunks may describe the same work. Classify their \
         relationship and decide which to keep.\n\
         \n\
         Chunk 1 (created {created_1}):\n\
         keys: {keys_1}\n\
         text: {text_1}\n\
         \n\
         Chunk 2 (created {created_2}):\n\
         keys: {keys_2}\n\
         text: {text_2}\n\
         \n\
         Respond with JSON: {{\"type\": \"duplicate_work\" | \
         \"sequential_iteration\" | \"contextual_convergence\", \
         \"direction\": \"forward\" | \"backward\" | \"unknown\", \
         \"reasoning\": string, \"keep\": \"first\" | \"second\" | \"merge\"}}",
        created_1 = first.created_at.to_rfc3339(),
        keys_1 = first.qntm_keys.join(", "),
        text_1 = first.original_text,
        created_2 = second.created_at.to_rfc3339(),
        keys_2 = second.qntm_keys.join(", "),
        text_2 = second.original_text,
    )
}
