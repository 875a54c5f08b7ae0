pub mod network {
    pub const DEFAULT_HOST: &str = "localhost";
    pub const DEFAULT_PORT: u16 = 8161;
    pub const TIMEOUT_JOLOKIA_REQUEST_MS: u64 = 30_000;
    pub const JOLOKIA_PATH: &str = "/console/jolokia";
}

pub mod broker {
    pub const DEFAULT_BROKER_NAME: &str = "amq-broker-primary";
    pub const DEFAULT_ORIGIN: &str = "mydomain.com";
    pub const DEFAULT_ROUTING_TYPE: &str = "anycast";
    pub const ARTEMIS_DOMAIN: &str = "org.apache.activemq.artemis";
    pub const QUEUE_SUBCOMPONENT: &str = "queues";
    pub const VERSION_ATTRIBUTE: &str = "Version";
    pub const BROWSE_OPERATION: &str = "browse()";
}

pub mod jolokia {
    pub const STATUS_OK: u16 = 200;
    pub const QUOTE_ESCAPE: &str = "!%22";
}

pub mod limits {
    pub const MAX_PORT: u16 = 65_535;
    pub const MIN_PORT: u16 = 1;
    pub const LOG_BODY_PREVIEW_BYTES: usize = 256;
    pub const LOG_STRING_MAX_BYTES: usize = 2_048;
}
