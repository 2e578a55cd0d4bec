use std::collections::HashMap;

synchronized::synchronized! {
    /// A registry keyed by name.
    #[derive(Debug)]
    pub(crate) struct Registry<V: Clone + Send>
    where
        V: Default,
    {
        #[locked(LockKind::Checked)]
        pub let mut entries = HashMap::<String, V>::new();
        #[locked(Checked)]
        pub let mut fallback: V = V::default();
        pub owner: &'static str,
    }
}

fn main() {
    let registry: Registry<u32> = Registry::new("main");
    let mut entries = registry.entries();
    entries.insert("a".to_owned(), registry.fallback());
    registry.set_entries(entries);
    assert_eq!(registry.owner, "main");
}
