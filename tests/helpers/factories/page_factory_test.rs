use crate::test_helpers::factory::Factory;

#[test]
fn creates_page_with_blocks_in_order() {
    let page = Factory::page()
        .with_longs(&[Some(1), None])
        .with_strings(&[Some("a"), Some("b")])
        .create();

    assert_eq!(page.channel_count(), 2);
    assert_eq!(page.position_count(), 2);
    assert!(page.block(0).unwrap().is_null(1));
    assert_eq!(page.block(1).unwrap().slice(1).unwrap(), b"b");
}
