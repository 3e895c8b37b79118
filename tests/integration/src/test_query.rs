//! Query compilation tests.

#[cfg(test)]
mod tests {
    use rustack_query_core::{FilterBuilder, PredicateKind, QueryError};
    use rustack_query_model::input::QueryInput;
    use rustack_query_model::AttributeValue;
    use serde_json::json;

    use crate::test_table;

    #[test]
    fn test_should_compile_index_query_with_filter() -> anyhow::Result<()> {
        let request = test_table("commissions")
            .with_index("client_id-retailer_id-index")
            .query()
            .key_eq("client_id", "shoop")?
            .key_gt_eq("retailer_id", 100)?
            .not_eq("state", "void")?
            .descending()
            .compile(None)?;

        tracing::debug!(body = %request.to_json()?, "compiled query");
        assert_eq!(
            request.into_value(),
            json!({
                "TableName": "commissions",
                "IndexName": "client_id-retailer_id-index",
                "KeyConditionExpression": "(client_id = :p1 and retailer_id >= :p2)",
                "FilterExpression": "(state <> :p3)",
                "ExpressionAttributeValues": {
                    ":p1": {"S": "shoop"},
                    ":p2": {"N": "100"},
                    ":p3": {"S": "void"}
                },
                "ScanIndexForward": false
            })
        );
        Ok(())
    }

    #[test]
    fn test_should_decode_into_typed_input() -> anyhow::Result<()> {
        let input: QueryInput = test_table("games")
            .query()
            .key_begins_with("pk", "GAME#")?
            .key_lt("sk", 5)?
            .compile(None)?
            .into_input()?;

        assert_eq!(
            input.key_condition_expression.as_deref(),
            Some("(begins_with(pk, :p1) and sk < :p2)")
        );
        assert_eq!(
            input.expression_attribute_values.get(":p2"),
            Some(&AttributeValue::number(5))
        );
        assert!(input.filter_expression.is_none());
        Ok(())
    }

    #[test]
    fn test_should_reject_filter_only_kinds_in_key_condition() {
        let err = test_table("games")
            .query()
            .key_condition(PredicateKind::Contains, "pk", "x")
            .unwrap_err();
        assert!(matches!(err, QueryError::UnsupportedOperation { name } if name == "keyContains"));
    }

    #[test]
    fn test_should_group_filter_without_touching_key_condition() -> anyhow::Result<()> {
        let query = test_table("games")
            .query()
            .key_eq("pk", "GAME#1")?
            .gt("score", 10)?
            .group(rustack_query_core::Connective::Or, |g| {
                g.lt_eq("score", 2)?.and_eq("flagged", true)
            })?;

        let input = query.to_input();
        assert_eq!(input.key_condition_expression.as_deref(), Some("(pk = :p1)"));
        assert_eq!(
            input.filter_expression.as_deref(),
            Some("(score > :p2 or (score <= :p3 and flagged = :p4))")
        );
        assert_eq!(input.expression_attribute_values[":p4"], AttributeValue::Bool(true));
        Ok(())
    }
}
