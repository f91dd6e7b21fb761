use crate::engine::types::ValueType;
use crate::test_helpers::factories::OutputColumnFactory;
use crate::test_helpers::factory::Factory;

#[test]
fn creates_column_with_overrides() {
    let column = Factory::column()
        .with_name("price")
        .with_channel(3)
        .with_type(ValueType::Double)
        .create();

    assert_eq!(column.name, "price");
    assert_eq!(column.source_page_channel, 3);
    assert_eq!(column.value_type, ValueType::Double);
}

#[test]
fn create_list_assigns_sequential_channels() {
    let columns = OutputColumnFactory::create_list(vec![ValueType::BigInt, ValueType::varchar()]);
    assert_eq!(columns[0].source_page_channel, 0);
    assert_eq!(columns[1].source_page_channel, 1);
    assert_eq!(columns[1].name, "c1");
}
