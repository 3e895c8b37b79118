//! BatchWriteItem compilation tests.

#[cfg(test)]
mod tests {
    use rustack_query_model::input::BatchWriteItemInput;
    use rustack_query_model::{AttributeValue, Item};
    use serde_json::json;

    use crate::{test_table, test_table_name};

    #[test]
    fn test_should_group_puts_and_deletes_by_table() -> anyhow::Result<()> {
        let orders = test_table_name("orders");
        let archive = test_table_name("archive");

        let request = test_table(&orders)
            .batch_write()
            .put(&json!({"id": "o-1", "total": 10}))?
            .put(&json!({"id": "o-2", "total": 25.5}))?
            .table(archive.clone())
            .delete(&json!({"id": "o-0"}))?
            .compile(None)?;

        let input: BatchWriteItemInput = request.into_input()?;
        assert_eq!(input.request_items.len(), 2);

        let puts = &input.request_items[&orders];
        assert_eq!(puts.len(), 2);
        let first = puts[0].put_request.as_ref().map(|p| &p.item["id"]);
        let second = puts[1].put_request.as_ref().map(|p| &p.item["total"]);
        assert_eq!(first, Some(&AttributeValue::from("o-1")));
        assert_eq!(second, Some(&AttributeValue::N("25.5".to_owned())));

        let deletes = &input.request_items[&archive];
        assert_eq!(deletes.len(), 1);
        assert!(deletes[0].put_request.is_none());
        assert_eq!(
            deletes[0].delete_request.as_ref().map(|d| &d.key["id"]),
            Some(&AttributeValue::from("o-0"))
        );
        Ok(())
    }

    #[test]
    fn test_should_serialize_nested_item_values() -> anyhow::Result<()> {
        let request = test_table("games")
            .batch_write()
            .put(&json!({"id": 1, "tags": ["a", "b"], "meta": {"live": true, "note": null}}))?
            .compile(None)?;

        assert_eq!(
            request.into_value(),
            json!({
                "RequestItems": {
                    "games": [{
                        "PutRequest": {
                            "Item": {
                                "id": {"N": "1"},
                                "tags": {"L": [{"S": "a"}, {"S": "b"}]},
                                "meta": {"M": {"live": {"BOOL": true}, "note": {"NULL": true}}}
                            }
                        }
                    }]
                }
            })
        );
        Ok(())
    }

    #[test]
    fn test_should_accept_premarshaled_items() -> anyhow::Result<()> {
        let item = Item::from([
            ("id".to_owned(), AttributeValue::from("x")),
            ("blob".to_owned(), AttributeValue::from(vec![1_u8, 2, 3])),
        ]);
        let request = test_table("files").batch_write().put_item(item).compile(None)?;
        let body = request.into_value();
        assert_eq!(
            body["RequestItems"]["files"][0]["PutRequest"]["Item"]["blob"],
            json!({"B": "AQID"})
        );
        Ok(())
    }
}
