use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};

use super::error::ServiceError;
use crate::constants::{SOAP_ENV_NS, XSD_NS, XSI_NS};

const OPERATION_PREFIX: &str = "tns";

/// Whether a property element carries the operation namespace or none at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualification {
    Qualified,
    Unqualified,
}

/// A simple value carried by a request property
#[derive(Debug, Clone, PartialEq)]
pub enum SoapScalar {
    Long(i64),
    Double(f64),
    Text(String),
}

impl SoapScalar {
    fn xsd_type(&self) -> &'static str {
        match self {
            SoapScalar::Long(_) => "xsd:long",
            SoapScalar::Double(_) => "xsd:double",
            SoapScalar::Text(_) => "xsd:string",
        }
    }

    /// Lexical form as expected by an XML schema parser
    fn lexical(&self) -> String {
        match self {
            SoapScalar::Long(v) => v.to_string(),
            SoapScalar::Double(v) if v.is_nan() => "NaN".to_string(),
            SoapScalar::Double(v) if v.is_infinite() => {
                if v.is_sign_positive() { "INF" } else { "-INF" }.to_string()
            }
            SoapScalar::Double(v) => v.to_string(),
            SoapScalar::Text(v) => v.clone(),
        }
    }
}

impl From<i64> for SoapScalar {
    fn from(value: i64) -> Self {
        SoapScalar::Long(value)
    }
}

impl From<f64> for SoapScalar {
    fn from(value: f64) -> Self {
        SoapScalar::Double(value)
    }
}

impl From<&str> for SoapScalar {
    fn from(value: &str) -> Self {
        SoapScalar::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoapProperty {
    pub name: String,
    pub qualification: Qualification,
    pub value: SoapScalar,
}

/// An operation call, serialized as a SOAP 1.1 envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SoapRequest {
    namespace: String,
    operation: String,
    properties: Vec<SoapProperty>,
    /// When false every property is annotated with its `xsi:type`
    implicit_types: bool,
}

impl SoapRequest {
    pub fn new(namespace: &str, operation: &str) -> Self {
        SoapRequest {
            namespace: namespace.to_string(),
            operation: operation.to_string(),
            properties: Vec::new(),
            implicit_types: true,
        }
    }

    /// Add a property in the operation namespace.
    pub fn with_property(self, name: &str, value: impl Into<SoapScalar>) -> Self {
        self.push(name, Qualification::Qualified, value.into())
    }

    /// Add a property without any namespace (`{}name`).
    pub fn with_unqualified_property(self, name: &str, value: impl Into<SoapScalar>) -> Self {
        self.push(name, Qualification::Unqualified, value.into())
    }

    pub fn with_explicit_types(mut self) -> Self {
        self.implicit_types = false;
        self
    }

    fn push(mut self, name: &str, qualification: Qualification, value: SoapScalar) -> Self {
        self.properties.push(SoapProperty {
            name: name.to_string(),
            qualification,
            value,
        });
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn properties(&self) -> &[SoapProperty] {
        &self.properties
    }

    /// Value of the `SOAPAction` header: namespace followed by the operation name.
    pub fn action(&self) -> String {
        format!("{}{}", self.namespace, self.operation)
    }

    pub fn to_xml(&self) -> Result<String, ServiceError> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(encode)?;
        writer
            .write_event(Event::Start(BytesStart::new("soap:Envelope").with_attributes([
                ("xmlns:soap", SOAP_ENV_NS),
                ("xmlns:xsi", XSI_NS),
                ("xmlns:xsd", XSD_NS),
            ])))
            .map_err(encode)?;
        writer
            .write_event(Event::Start(BytesStart::new("soap:Body")))
            .map_err(encode)?;

        let operation_tag = format!("{OPERATION_PREFIX}:{}", self.operation);
        let namespace_attribute = format!("xmlns:{OPERATION_PREFIX}");
        let operation_start = BytesStart::new(operation_tag.as_str())
            .with_attributes([(namespace_attribute.as_str(), self.namespace.as_str())]);

        if self.properties.is_empty() {
            writer
                .write_event(Event::Empty(operation_start))
                .map_err(encode)?;
        } else {
            writer
                .write_event(Event::Start(operation_start))
                .map_err(encode)?;
            for property in &self.properties {
                let tag = match property.qualification {
                    Qualification::Qualified => format!("{OPERATION_PREFIX}:{}", property.name),
                    Qualification::Unqualified => property.name.clone(),
                };
                let mut start = BytesStart::new(tag.as_str());
                if !self.implicit_types {
                    start.push_attribute(("xsi:type", property.value.xsd_type()));
                }
                writer.write_event(Event::Start(start)).map_err(encode)?;
                writer
                    .write_event(Event::Text(BytesText::new(&property.value.lexical())))
                    .map_err(encode)?;
                writer
                    .write_event(Event::End(BytesEnd::new(tag.as_str())))
                    .map_err(encode)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(operation_tag.as_str())))
                .map_err(encode)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("soap:Body")))
            .map_err(encode)?;
        writer
            .write_event(Event::End(BytesEnd::new("soap:Envelope")))
            .map_err(encode)?;

        String::from_utf8(writer.into_inner()).map_err(encode)
    }
}

fn encode(err: impl std::fmt::Display) -> ServiceError {
    ServiceError::Encode(err.to_string())
}
