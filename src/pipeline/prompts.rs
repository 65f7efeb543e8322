//! Prompt text for the LLM-backed stages
//!
//! Every prompt that can influence which rows are read embeds the caller's
//! identity. Nothing here talks to the model.

use super::identity::Identity;

pub fn relevance_system(identity: &Identity) -> String {
    format!(
        "You are a database expert. The user asking has user_id {} and email {}; \
         prefer tables that hold rows owned by this user. Given the user's question \
         and the database schema, return only the single most relevant table name \
         needed to answer the question. Return just the table name as plain text, \
         without quotes, punctuation, explanation or formatting.",
        identity.user_id, identity.email
    )
}

pub fn relevance_user(schema_description: &str, question: &str) -> String {
    format!(
        "Schema:\n{}\n\nQuestion: {}\n\nReturn only the most relevant table name.",
        schema_description, question
    )
}

pub fn synthesis_system(
    table: &str,
    column_description: &str,
    sample_text: &str,
    identity: &Identity,
) -> String {
    format!(
        "You are a ClickHouse SQL expert with READ-ONLY access to the database. \
         Never generate INSERT, UPDATE, DELETE, ALTER, DROP, CREATE, TRUNCATE or any \
         other statement that modifies data or schema; produce exactly one SELECT \
         statement.\n\n\
         Database context:\n\
         Table {table}:\nColumns: {columns}\n\n\
         Table content sample:\n{sample}...\n\n\
         The user has user_id {user_id} and email {email}. Only reference rows that \
         belong to this user; never return information about other users.\n\
         Return ONLY the raw SQL query without markdown formatting, code fences, \
         explanations or any additional text.\n\
         Generate a SQL query that answers the user's question using the provided table.",
        table = table,
        columns = column_description,
        sample = sample_text,
        user_id = identity.user_id,
        email = identity.email,
    )
}

pub const INTERPRETATION_SYSTEM: &str = "You are an expert at interpreting database results. \
Provide a clear, natural language answer to the user's question based only on the results \
provided. Include relevant context from the data but be concise. If the results are empty, \
say that no matching records were found.";

pub fn interpretation_user(
    question: &str,
    query: &str,
    table: &str,
    sample_text: &str,
    results_json: &str,
) -> String {
    format!(
        "Original question: {}\n\
         Query executed: {}\n\
         Table used: {}\n\
         Table content sample: {}\n\
         Results: {}\n\
         Please provide a clear answer to the original question based on these results.",
        question, query, table, sample_text, results_json
    )
}
