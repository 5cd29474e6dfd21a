use market::gateway::AttributeValue;

use super::*;

fn attr(trait_type: &str, value: &str) -> Attribute {
    Attribute { trait_type: trait_type.to_owned(), value: AttributeValue::Text(value.to_owned()) }
}

#[test]
fn attribute_chips_collapse_after_three() {
    let attrs = vec![attr("Eyes", "Blue"), attr("Hat", "Cap"), attr("Fur", "Gold"), attr("Bg", "Red"), attr("Mouth", "Grin")];
    let (chips, overflow) = attribute_chips(&attrs);
    assert_eq!(chips, ["Eyes: Blue", "Hat: Cap", "Fur: Gold"]);
    assert_eq!(overflow.as_deref(), Some("+2 more"));
}

#[test]
fn attribute_chips_without_overflow() {
    let (chips, overflow) = attribute_chips(&[attr("Eyes", "Blue")]);
    assert_eq!(chips, ["Eyes: Blue"]);
    assert!(overflow.is_none());
    assert_eq!(attribute_chips(&[]), (Vec::new(), None));
}

#[test]
fn numeric_attribute_values_render_plainly() {
    let level = Attribute { trait_type: "Level".to_owned(), value: AttributeValue::Number(7.into()) };
    assert_eq!(attribute_chips(&[level]).0, ["Level: 7"]);
}

#[test]
fn seller_initials_are_uppercased() {
    assert_eq!(seller_initials("abc123"), "AB");
    assert_eq!(seller_initials("x"), "X");
}
