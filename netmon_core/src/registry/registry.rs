use fxhash::FxHashSet;
use log::debug;

/// observe 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    FirstSeen,
    AlreadySeen,
}

impl Observation {
    pub fn is_first_seen(&self) -> bool {
        matches!(self, Observation::FirstSeen)
    }
}

/// 去重地址集合，保留首次出现顺序
///
/// 哈希集合负责 O(1) 查重，`order` 只追加，用于按出现顺序列出地址。
#[derive(Debug, Default)]
pub struct AddressRegistry {
    name: &'static str,
    seen: FxHashSet<String>,
    order: Vec<String>,
}

impl AddressRegistry {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            seen: FxHashSet::default(),
            order: Vec::new(),
        }
    }

    pub fn observe(&mut self, addr: &str) -> Observation {
        if self.seen.contains(addr) {
            return Observation::AlreadySeen;
        }
        self.seen.insert(addr.to_string());
        self.order.push(addr.to_string());
        debug!("新{}地址: {} (共 {} 个)", self.name, addr, self.order.len());
        Observation::FirstSeen
    }

    pub fn contains(&self, addr: &str) -> bool {
        self.seen.contains(addr)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按首次出现顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn addresses(&self) -> &[String] {
        &self.order
    }
}
