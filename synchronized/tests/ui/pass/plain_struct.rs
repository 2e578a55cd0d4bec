synchronized::synchronized! {
    struct Plain {
        a: u8,
        b: String,
    }
}

fn main() {
    let plain = Plain::new(1, "b".to_owned());
    assert_eq!(plain.a, 1);
    assert_eq!(plain.b, "b");
}
