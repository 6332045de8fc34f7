pub const NAMESPACE: &str = "http://ws.tp12_webservicesoap.tp.com/";
pub const BASE_URL: &str = "http://10.0.2.2:8080/services/ws";
pub const TIMEOUT_SECS: u64 = 30;

pub const GET_ACCOUNTS_OPERATION: &str = "getComptes";
pub const CREATE_ACCOUNT_OPERATION: &str = "createCompte";
pub const DELETE_ACCOUNT_OPERATION: &str = "deleteCompte";

pub const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
