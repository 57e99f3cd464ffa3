use entmeta::{
    Entity, Reflect, Value, collection, concrete_collection_for, enumerate_members, is_collection,
    resolve_identifier_type, resolve_identifier_value, types,
};

#[derive(Entity)]
struct Customer {
    #[entmeta(id)]
    id: i64,
    pub name: String,
}

#[derive(Entity)]
struct Memo {
    pub text: String,
}

#[derive(Entity)]
#[entmeta(annotation = "Entity")]
struct Order {
    #[entmeta(id)]
    number: i64,
    customer: Customer,
    #[entmeta(annotation = "Transient")]
    memo: Option<Memo>,
}

#[derive(Entity)]
struct Category {
    #[entmeta(id)]
    code: String,
    parent: Option<Box<Category>>,
    children: Vec<Category>,
}

fn category(code: &str, parent: Option<Category>, children: Vec<Category>) -> Category {
    Category {
        code: code.to_string(),
        parent: parent.map(Box::new),
        children,
    }
}

#[test]
fn entity_typed_members_are_described() {
    let members = enumerate_members(Some(Order::TYPE));
    let listed: Vec<(&str, &str)> = members
        .iter()
        .map(|m| (m.name, m.declared_type().name))
        .collect();
    assert_eq!(
        listed,
        [("number", "i64"), ("customer", "Customer"), ("memo", "Memo")]
    );
    assert_eq!(members[1].declared_type(), Customer::TYPE);
}

#[test]
fn associated_entity_reads_as_its_identifier() {
    let order = Order {
        number: 100,
        customer: Customer {
            id: 7,
            name: "Ada".to_string(),
        },
        memo: None,
    };

    assert_eq!(order.read_member(Order::TYPE, "customer"), Some(Value::BigInt(7)));
    assert_eq!(order.read_member(Order::TYPE, "memo"), Some(Value::Null));
    assert_eq!(resolve_identifier_value(&order).unwrap(), Value::BigInt(100));

    // no identifier on the associated type
    let order = Order {
        memo: Some(Memo {
            text: "call back".to_string(),
        }),
        ..order
    };
    assert_eq!(order.read_member(Order::TYPE, "memo"), Some(Value::Null));
}

#[test]
fn self_referencing_entity() {
    let members = enumerate_members(Some(Category::TYPE));
    let parent = members.iter().find(|m| m.name == "parent").unwrap();
    let children = members.iter().find(|m| m.name == "children").unwrap();

    assert_eq!(parent.declared_type(), Category::TYPE);
    assert!(is_collection(children.declared_type()));
    assert_eq!(
        concrete_collection_for(children.declared_type()),
        Some(collection::VEC)
    );
    assert_eq!(resolve_identifier_type(Category::TYPE).unwrap(), types::TEXT);
}

#[test]
fn self_referencing_members_read_through_the_tree() {
    let root = category("root", None, Vec::new());
    assert_eq!(root.read_member(Category::TYPE, "parent"), Some(Value::Null));

    let leaf = category("leaf", None, Vec::new());
    let child = category("child", Some(root), vec![leaf]);

    assert_eq!(
        child.read_member(Category::TYPE, "parent"),
        Some(Value::Text("root".to_string()))
    );
    assert_eq!(
        child.read_member(Category::TYPE, "children"),
        Some(Value::Array(vec![Value::Text("leaf".to_string())]))
    );
    assert_eq!(
        resolve_identifier_value(&child).unwrap(),
        Value::Text("child".to_string())
    );
}
