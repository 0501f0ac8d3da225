use crate::node::Node;

/// Sequential id generator for component nodes within a document
///
/// Ids have the shape `{component_type}-{n}`. The counter only moves
/// forward, and a generator seeded from an existing tree starts past every
/// numeric suffix already in use, so two insertions never collide.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator whose next id is unused in `doc`
    pub fn seeded_from(doc: &Node) -> Self {
        let mut gen = Self::new();
        for (node, _) in doc.descendants() {
            if let Some(id) = node.id() {
                gen.observe(id);
            }
        }
        gen
    }

    /// Make sure future ids sort past `id`
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = id
            .rsplit_once('-')
            .and_then(|(_, suffix)| suffix.parse::<u64>().ok())
        {
            self.count = self.count.max(n);
        }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self, component_type: &str) -> String {
        self.count += 1;
        format!("{}-{}", component_type, self.count)
    }
}
