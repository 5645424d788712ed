pub use self::classify::{
    classify, ArpOperation, Classification, Classified, Classifier, NetworkHeader, Transport, IP_PROTOCOL_ICMP,
    IP_PROTOCOL_ICMPV6, IP_PROTOCOL_IGMP, IP_PROTOCOL_TCP, IP_PROTOCOL_UDP,
};

#[allow(clippy::module_inception)]
mod classify;
