//! Scan compilation tests.

#[cfg(test)]
mod tests {
    use rustack_query_core::expression::Expression;
    use rustack_query_core::{
        Connective, FilterBuilder, Operand, PlaceholderStrategy, PredicateSpec, QueryConfig,
        QueryError,
    };
    use rustack_query_model::input::ScanInput;
    use serde_json::json;

    use crate::{configured_table, test_table, test_table_name};

    #[test]
    fn test_should_compile_aliased_or_filter() -> anyhow::Result<()> {
        let request = test_table("users")
            .scan()
            .eq("status", "active")?
            .or_contains("#name", "Alice")?
            .with_attribute_names([("#name", "name")])
            .compile(None)?;

        assert_eq!(
            request.into_value(),
            json!({
                "TableName": "users",
                "FilterExpression": "(status = :p1 or contains(#name, :p2))",
                "ExpressionAttributeValues": {
                    ":p1": {"S": "active"},
                    ":p2": {"S": "Alice"}
                },
                "ExpressionAttributeNames": {"#name": "name"}
            })
        );
        Ok(())
    }

    #[test]
    fn test_should_chain_mixed_connectives_in_order() -> anyhow::Result<()> {
        let request = test_table("games")
            .scan()
            .eq("id", 2)?
            .or_eq("id", 3)?
            .and_begins_with("game", "C")?
            .or_in("genre", ["sport", "racing"])?
            .compile(None)?;

        assert_eq!(
            request.filter_expression(),
            Some("(id = :p1 or id = :p2 and begins_with(game, :p3) or genre in (:p4,:p5))")
        );
        let values = request
            .get("ExpressionAttributeValues")
            .and_then(|v| v.as_object())
            .map(serde_json::Map::len);
        assert_eq!(values, Some(5));
        Ok(())
    }

    #[test]
    fn test_should_embed_sub_query_as_one_leaf() -> anyhow::Result<()> {
        let scan = test_table("games").scan().gt("year", 2000)?;
        let child = scan.branch().eq("game", "FIFA")?.or_eq("game", "PES")?;
        let child_bindings = child.filter_tree().bindings();

        let request = scan.sub_query(&child, Connective::And)?.compile(None)?;
        assert_eq!(
            request.filter_expression(),
            Some("(year > :p1 and (game = :p2 or game = :p3))")
        );

        let input: ScanInput = request.into_input()?;
        for (placeholder, value) in child_bindings {
            assert_eq!(input.expression_attribute_values.get(&placeholder), Some(&value));
        }
        assert_eq!(input.expression_attribute_values.len(), 3);
        Ok(())
    }

    #[test]
    fn test_should_embed_scan_from_same_table() -> anyhow::Result<()> {
        let table = test_table("games");
        let child = table
            .scan()
            .begins_with("#game", "Splash")?
            .or_begins_with("#version", "ww2")?;
        let request = table
            .scan()
            .eq("#status", "disabled")?
            .sub_query(&child, Connective::And)?
            .with_attribute_names([
                ("#status", "status"),
                ("#game", "game"),
                ("#version", "version"),
            ])
            .compile(None)?;

        assert_eq!(
            request.filter_expression(),
            Some("(#status = :p3 and (begins_with(#game, :p1) or begins_with(#version, :p2)))")
        );
        assert_eq!(
            request.get("ExpressionAttributeValues"),
            Some(&json!({
                ":p1": {"S": "Splash"},
                ":p2": {"S": "ww2"},
                ":p3": {"S": "disabled"}
            }))
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_sub_query_from_separate_table() {
        let scan = test_table("games").scan().eq("id", 1).unwrap();
        let stranger = test_table("games").scan().eq("id", 2).unwrap();
        assert!(matches!(
            scan.sub_query(&stranger, Connective::Or),
            Err(QueryError::PlaceholderCollision { .. })
        ));
    }

    #[test]
    fn test_should_let_overrides_win() -> anyhow::Result<()> {
        let overrides = json!({"Limit": 50, "FilterExpression": "(custom = :c)"});
        let overrides = overrides.as_object().cloned().unwrap_or_default();

        let request = test_table("games")
            .with_index("game-index")
            .scan()
            .eq("id", 1)?
            .compile(Some(&overrides))?;

        assert_eq!(request.filter_expression(), Some("(custom = :c)"));
        assert_eq!(request.get("Limit"), Some(&json!(50)));
        assert_eq!(request.index_name(), Some("game-index"));
        Ok(())
    }

    #[test]
    fn test_should_omit_filter_for_bare_scan() -> anyhow::Result<()> {
        let name = test_table_name("bare");
        let request = test_table(&name).scan().compile(None)?;
        assert_eq!(request.to_json()?, format!(r#"{{"TableName":"{name}"}}"#));
        Ok(())
    }

    #[test]
    fn test_should_dispatch_verbs_by_name() -> anyhow::Result<()> {
        let scan = test_table("games")
            .scan()
            .call("andEq", "id", Operand::scalar(1))?
            .call("or_not_eq", "id", Operand::scalar(2))?;
        assert_eq!(scan.filter_tree().render(), "(id = :p1 or id <> :p2)");

        let err = scan.call("orLike", "id", Operand::scalar(3)).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operation: orLike");
        Ok(())
    }

    #[test]
    fn test_should_apply_declarative_filters() -> anyhow::Result<()> {
        let specs: Vec<PredicateSpec> = serde_json::from_value(json!([
            {"expression": "GtEq", "key": "year", "value": 2010},
            {"expression": "Contains", "key": "tags", "value": "online", "operator": "or"}
        ]))?;
        let request = test_table("games").scan().apply_all(&specs)?.compile(None)?;
        assert_eq!(
            request.filter_expression(),
            Some("(year >= :p1 or contains(tags, :p2))")
        );

        let bad: PredicateSpec =
            serde_json::from_value(json!({"expression": "Near", "key": "x", "value": 1}))?;
        let err = test_table("games").scan().apply(&bad).unwrap_err();
        assert!(matches!(err, QueryError::UnknownPredicateKind { .. }));
        Ok(())
    }

    #[test]
    fn test_should_keep_random_placeholders_unique() -> anyhow::Result<()> {
        let config = QueryConfig {
            placeholder_strategy: PlaceholderStrategy::Random,
            ..QueryConfig::default()
        };
        let scan = configured_table("games", config)?
            .scan()
            .eq("id", 1)?
            .eq("id", 2)?
            .in_("id", [3, 4, 5])?;
        assert_eq!(scan.to_input().expression_attribute_values.len(), 5);
        Ok(())
    }
}
