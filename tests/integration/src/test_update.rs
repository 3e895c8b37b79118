//! UpdateItem compilation tests.

#[cfg(test)]
mod tests {
    use rustack_query_core::{Connective, Operand, PredicateKind};
    use rustack_query_model::input::UpdateItemInput;
    use rustack_query_model::types::ReturnValue;
    use rustack_query_model::{AttributeValue, Marshaler};
    use serde_json::json;

    use crate::test_table;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Game {
        id: u32,
        name: String,
        year: u16,
    }

    #[test]
    fn test_should_compile_update_from_key_and_values() -> anyhow::Result<()> {
        let request = test_table("games")
            .update()
            .build_update_query(&json!({"id": 2}), &json!({"name": "FIFA", "year": 2023}))?
            .compile(None)?;

        assert_eq!(
            request.into_value(),
            json!({
                "TableName": "games",
                "Key": {"id": {"N": "2"}},
                "UpdateExpression": "SET name = :p1, year = :p2",
                "ExpressionAttributeValues": {
                    ":p1": {"S": "FIFA"},
                    ":p2": {"N": "2023"}
                }
            })
        );
        Ok(())
    }

    #[test]
    fn test_should_update_only_changed_struct_fields() -> anyhow::Result<()> {
        let before = Game {
            id: 7,
            name: "PES".to_owned(),
            year: 2020,
        };
        let after = Game {
            year: 2021,
            ..before.clone()
        };

        let input: UpdateItemInput = test_table("games")
            .update()
            .diff(&json!({"id": 7}), &before, &after)?
            .return_values(ReturnValue::UpdatedNew)
            .compile(None)?
            .into_input()?;

        assert_eq!(input.update_expression.as_deref(), Some("SET year = :p1"));
        assert_eq!(
            input.expression_attribute_values.get(":p1"),
            Some(&AttributeValue::number(2021))
        );
        assert_eq!(input.return_values, Some(ReturnValue::UpdatedNew));
        Ok(())
    }

    #[test]
    fn test_should_keep_update_and_condition_placeholders_apart() -> anyhow::Result<()> {
        let input = test_table("games")
            .update()
            .key(&json!({"id": 1}))?
            .set("year", &2024)?
            .condition(Connective::And, PredicateKind::Lt, "year", Operand::scalar(2024))?
            .to_input();

        assert_eq!(input.update_expression.as_deref(), Some("SET year = :p1"));
        assert_eq!(input.condition_expression.as_deref(), Some("(year < :p2)"));
        assert_eq!(input.expression_attribute_values.len(), 2);
        Ok(())
    }

    #[test]
    fn test_should_roundtrip_item_through_marshaler() -> anyhow::Result<()> {
        let game = Game {
            id: 3,
            name: "Tetris".to_owned(),
            year: 1984,
        };
        let marshaler = Marshaler::new();
        let item = marshaler.marshal_item(&game)?;
        assert_eq!(item["name"], AttributeValue::from("Tetris"));
        let back: Game = marshaler.unmarshal_into(&item)?;
        assert_eq!(back, game);
        Ok(())
    }
}
