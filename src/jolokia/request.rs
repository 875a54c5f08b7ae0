use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JolokiaMethod {
    Read,
    Write,
    Exec,
    Search,
}

impl JolokiaMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            JolokiaMethod::Read => "read",
            JolokiaMethod::Write => "write",
            JolokiaMethod::Exec => "exec",
            JolokiaMethod::Search => "search",
        }
    }
}

impl fmt::Display for JolokiaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single GET-style Jolokia request. The MBean name must already be
/// escape-encoded; parameters are appended as path segments in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JolokiaRequest {
    method: JolokiaMethod,
    mbean_name: String,
    params: Vec<String>,
}

impl JolokiaRequest {
    pub fn new(method: JolokiaMethod, mbean_name: impl Into<String>) -> Self {
        Self {
            method,
            mbean_name: mbean_name.into(),
            params: Vec::new(),
        }
    }

    pub fn read(mbean_name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(JolokiaMethod::Read, mbean_name).with_param(attribute)
    }

    pub fn write(
        mbean_name: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(JolokiaMethod::Write, mbean_name)
            .with_param(attribute)
            .with_param(value)
    }

    pub fn exec<I, S>(mbean_name: impl Into<String>, operation: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::new(JolokiaMethod::Exec, mbean_name).with_param(operation);
        request.params.extend(args.into_iter().map(Into::into));
        request
    }

    pub fn search(pattern: impl Into<String>) -> Self {
        Self::new(JolokiaMethod::Search, pattern)
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    pub fn method(&self) -> JolokiaMethod {
        self.method
    }

    pub fn mbean_name(&self) -> &str {
        &self.mbean_name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn url(&self, base_url: &str) -> String {
        build_url(base_url, self.method, &self.mbean_name, &self.params)
    }
}

pub fn build_url(
    base_url: &str,
    method: JolokiaMethod,
    mbean_name: &str,
    params: &[String],
) -> String {
    let mut url = format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        method.as_str(),
        mbean_name
    );
    if !params.is_empty() {
        url.push('/');
        url.push_str(&params.join("/"));
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:8161/console/jolokia";

    #[test]
    fn empty_params_yield_bare_url() {
        let url = build_url(BASE, JolokiaMethod::Search, "org.apache.activemq.artemis:*", &[]);
        assert_eq!(
            url,
            "http://localhost:8161/console/jolokia/search/org.apache.activemq.artemis:*"
        );
    }

    #[test]
    fn read_appends_attribute() {
        let request = JolokiaRequest::read("d:broker=!%22b!%22", "Version");
        assert_eq!(
            request.url(BASE),
            "http://localhost:8161/console/jolokia/read/d:broker=!%22b!%22/Version"
        );
    }

    #[test]
    fn exec_keeps_operation_then_arguments_in_caller_order() {
        let request = JolokiaRequest::exec("m", "countMessages(java.lang.String)", ["x", "y"]);
        assert_eq!(
            request.params(),
            &["countMessages(java.lang.String)", "x", "y"]
        );
        assert_eq!(
            request.url(BASE),
            format!("{}/exec/m/countMessages(java.lang.String)/x/y", BASE)
        );
    }

    #[test]
    fn trailing_slash_on_base_is_not_doubled() {
        let request = JolokiaRequest::write("m", "Attr", "v");
        assert_eq!(request.url(&format!("{}/", BASE)), format!("{}/write/m/Attr/v", BASE));
    }

    #[test]
    fn empty_param_values_are_kept() {
        let request = JolokiaRequest::new(JolokiaMethod::Exec, "m")
            .with_param("op()")
            .with_param("");
        assert_eq!(request.url(BASE), format!("{}/exec/m/op()/", BASE));
    }
}
