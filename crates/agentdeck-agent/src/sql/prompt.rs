//! Prompts for the SQL agent.

use minijinja::{context, Environment};

/// Default number of rows the model is told to limit its queries to.
pub const DEFAULT_TOP_K: usize = 10;

const WRITE_QUERY_TEMPLATE: &str = "Given an input question, create a syntactically correct {{ dialect }} query to run to help find the answer. \
Unless the user specifies in their question a specific number of examples they wish to obtain, \
always limit your query to at most {{ top_k }} results. \
You can order the results by a relevant column to return the most interesting examples in the database.\n\n\
Never query for all the columns from a specific table, only ask for the few relevant columns given the question.\n\n\
Pay attention to use only the column names that you can see in the schema description. \
Be careful to not query for columns that do not exist. \
Also, pay attention to which column is in which table.\n\n\
Only use the following tables:\n{{ table_info }}\n\n\
Question: {{ input }}";

/// Prompt asking the model to write one query for `question`.
pub fn write_query_prompt(
    dialect: &str,
    top_k: usize,
    table_info: &str,
    question: &str,
) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template("write_query", WRITE_QUERY_TEMPLATE)?;
    env.get_template("write_query")?.render(context! {
        dialect => dialect,
        top_k => top_k,
        table_info => table_info,
        input => question,
    })
}

/// Prompt asking the model to answer `question` from a query and its result.
pub fn generate_answer_prompt(question: &str, query: &str, result: &str) -> String {
    format!(
        "Given the following user question, corresponding SQL query, \
         and SQL result, answer the user question.\n\n\
         Question: {question}\n\
         SQL Query: {query}\n\
         SQL Result: {result}\n"
    )
}
