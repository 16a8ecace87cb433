//! OpenAPI document → routable, validating contract.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::ValidationViolation;
use crate::error::ContractError;
use crate::schema::CompiledSchema;

const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Upper bound on chained `$ref` hops before giving up.
const MAX_REF_DEPTH: usize = 16;

/// Contract document compiled for validation. Immutable once built.
pub struct Contract {
    document: Value,
    router: matchit::Router<usize>,
    paths: Vec<PathItem>,
}

struct PathItem {
    template: String,
    operations: Vec<Operation>,
}

/// A single declared `method path` pair.
#[derive(Debug)]
pub struct Operation {
    method: String,
    path: String,
    operation_id: Option<String>,
    parameters: Vec<Parameter>,
    request_body: Option<RequestBody>,
    responses: HashMap<String, DeclaredResponse>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamLocation {
    Path,
    Query,
    Header,
}

impl ParamLocation {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
        }
    }
}

#[derive(Debug)]
struct Parameter {
    name: String,
    location: ParamLocation,
    required: bool,
    schema: Option<CompiledSchema>,
}

#[derive(Debug)]
struct RequestBody {
    required: bool,
    schema: Option<CompiledSchema>,
}

#[derive(Debug)]
struct DeclaredResponse {
    declares_content: bool,
    schema: Option<CompiledSchema>,
}

/// Outcome of resolving a method and path against the contract.
pub enum Lookup<'c> {
    /// The operation is declared; `path_params` holds the captured template values.
    Found {
        operation: &'c Operation,
        path_params: Vec<(String, String)>,
    },
    /// The path is declared, the method is not.
    MethodNotAllowed { allowed: Vec<&'c str> },
    /// The contract says nothing about this path.
    NotDeclared,
}

/// Raw inbound request pieces the contract inspects.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestParts<'a> {
    pub path_params: &'a [(String, String)],
    pub query: Option<&'a str>,
    pub headers: &'a [(&'a str, &'a str)],
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

/// Raw outbound response pieces the contract inspects.
#[derive(Debug, Clone, Copy)]
pub struct ResponseParts<'a> {
    pub status: u16,
    pub content_type: Option<&'a str>,
    pub body: &'a [u8],
}

impl Contract {
    /// Builds a contract from an already parsed OpenAPI 3.x document.
    ///
    /// # Errors
    ///
    /// Fails if the document is not OpenAPI 3.x, has no `paths`, contains
    /// path templates that cannot be routed, dangling references, or schemas
    /// that do not compile.
    pub fn from_document(document: Value) -> Result<Self, ContractError> {
        let version = document
            .get("openapi")
            .and_then(Value::as_str)
            .ok_or(ContractError::MissingField("openapi"))?;
        if !version.starts_with("3.") {
            return Err(ContractError::UnsupportedVersion(version.to_owned()));
        }

        let raw_paths = document
            .get("paths")
            .and_then(Value::as_object)
            .ok_or(ContractError::MissingField("paths"))?;

        let components = document.get("components");
        let mut router = matchit::Router::new();
        let mut paths = Vec::with_capacity(raw_paths.len());

        for (template, item) in raw_paths {
            let item = resolve(&document, item)?;
            let operations = compile_path_item(&document, components, template, item)?;

            router
                .insert(template.clone(), paths.len())
                .map_err(|e| ContractError::InvalidPath {
                    path: template.clone(),
                    reason: e.to_string(),
                })?;
            paths.push(PathItem {
                template: template.clone(),
                operations,
            });
        }

        debug!(
            paths = paths.len(),
            operations = paths.iter().map(|p| p.operations.len()).sum::<usize>(),
            "API contract compiled"
        );

        Ok(Self {
            document,
            router,
            paths,
        })
    }

    /// Parses and compiles a JSON contract document.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or any [`Contract::from_document`] error.
    pub fn from_json_str(raw: &str) -> Result<Self, ContractError> {
        Self::from_document(serde_json::from_str(raw)?)
    }

    /// Reads, parses and compiles a JSON contract document from disk.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or on any [`Contract::from_json_str`] error.
    pub fn from_file(path: &Path) -> Result<Self, ContractError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// The document this contract was built from, as served to clients.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// All declared operations, in document order per path.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.paths.iter().flat_map(|p| p.operations.iter())
    }

    /// Resolves a request line against the declared paths.
    #[must_use]
    pub fn lookup(&self, method: &str, path: &str) -> Lookup<'_> {
        let Ok(matched) = self.router.at(path) else {
            return Lookup::NotDeclared;
        };
        let item = &self.paths[*matched.value];

        match item.operation(method).or_else(|| item.implicit_head(method)) {
            Some(operation) => Lookup::Found {
                operation,
                path_params: matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect(),
            },
            None => Lookup::MethodNotAllowed {
                allowed: item.allowed_methods(),
            },
        }
    }
}

impl PathItem {
    fn operation(&self, method: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|op| op.method.eq_ignore_ascii_case(method))
    }

    /// `HEAD` is served by the `GET` operation unless the path declares its own.
    fn implicit_head(&self, method: &str) -> Option<&Operation> {
        if method.eq_ignore_ascii_case("HEAD") {
            self.operation("GET")
        } else {
            None
        }
    }

    fn allowed_methods(&self) -> Vec<&str> {
        let mut allowed: Vec<&str> = self.operations.iter().map(|op| op.method.as_str()).collect();
        if self.operation("HEAD").is_none() && self.operation("GET").is_some() {
            allowed.push("HEAD");
        }
        allowed
    }
}

impl std::fmt::Debug for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contract")
            .field(
                "paths",
                &self.paths.iter().map(|p| p.template.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Operation {
    /// Upper-case HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Path template as declared, e.g. `/calculator/{id}`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn operation_id(&self) -> Option<&str> {
        self.operation_id.as_deref()
    }

    /// Checks parameters and body of an inbound request.
    ///
    /// # Errors
    ///
    /// Returns every violation found; an empty list is never returned as an error.
    pub fn validate_request(
        &self,
        parts: &RequestParts<'_>,
    ) -> Result<(), Vec<ValidationViolation>> {
        let mut violations = Vec::new();
        let query = parse_query(parts.query, &mut violations);

        for param in &self.parameters {
            let raw = match param.location {
                ParamLocation::Path => lookup_pair(parts.path_params, &param.name),
                ParamLocation::Query => query
                    .iter()
                    .find(|(k, _)| *k == param.name)
                    .map(|(_, v)| v.as_str()),
                ParamLocation::Header => parts
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(&param.name))
                    .map(|(_, v)| *v),
            };
            param.check(raw, &mut violations);
        }

        if let Some(body) = &self.request_body {
            body.check(parts.content_type, parts.body, &mut violations);
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Checks an outbound response against the declaration for its status.
    ///
    /// # Errors
    ///
    /// Returns every violation found, including an undeclared status code.
    pub fn validate_response(
        &self,
        parts: &ResponseParts<'_>,
    ) -> Result<(), Vec<ValidationViolation>> {
        let declared = self.declared_response(parts.status)?;

        let mut violations = Vec::new();
        if !declared.declares_content {
            if !parts.body.is_empty() {
                violations.push(ValidationViolation::new(
                    "body",
                    format!("status {} declares no content", parts.status),
                ));
            }
        } else if let Some(schema) = &declared.schema {
            if !is_json(parts.content_type) {
                violations.push(ValidationViolation::new(
                    "header.content-type",
                    format!(
                        "expected a JSON content type, got {}",
                        parts.content_type.unwrap_or("none")
                    ),
                ));
            }
            match serde_json::from_slice::<Value>(parts.body) {
                Ok(body) => violations.extend(schema.violations(&body, "body")),
                Err(e) => violations.push(ValidationViolation::new(
                    "body",
                    format!("response body is not valid JSON: {e}"),
                )),
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Checks only that `status` is declared. Used for bodiless replies such as `HEAD`.
    ///
    /// # Errors
    /// Returns a single `status` violation when the operation does not declare it.
    pub fn validate_status(&self, status: u16) -> Result<(), Vec<ValidationViolation>> {
        self.declared_response(status).map(|_| ())
    }

    fn declared_response(
        &self,
        status: u16,
    ) -> Result<&DeclaredResponse, Vec<ValidationViolation>> {
        self.response_for(status).ok_or_else(|| {
            vec![ValidationViolation::new(
                "status",
                format!("status {status} is not declared for {} {}", self.method, self.path),
            )]
        })
    }

    /// Exact status, then its `NXX` range, then `default`.
    fn response_for(&self, status: u16) -> Option<&DeclaredResponse> {
        let exact = status.to_string();
        let range = format!("{}XX", status / 100);
        self.responses
            .get(&exact)
            .or_else(|| self.responses.get(&range))
            .or_else(|| self.responses.get("default"))
    }
}

impl Parameter {
    fn check(&self, raw: Option<&str>, violations: &mut Vec<ValidationViolation>) {
        let field = format!("{}.{}", self.location.as_str(), self.name);
        let Some(raw) = raw else {
            if self.required {
                violations.push(ValidationViolation::new(
                    field,
                    format!("required {} parameter is missing", self.location.as_str()),
                ));
            }
            return;
        };
        let Some(schema) = &self.schema else {
            return;
        };

        // Parameters arrive as text; accept them as a string or as the JSON
        // scalar they spell (`42`, `true`) so numeric schemas can match.
        let as_text = Value::String(raw.to_owned());
        if schema.is_valid(&as_text) {
            return;
        }
        if let Ok(scalar) = serde_json::from_str::<Value>(raw) {
            if !scalar.is_object() && !scalar.is_array() && schema.is_valid(&scalar) {
                return;
            }
        }
        violations.extend(schema.violations(&as_text, &field));
    }
}

impl RequestBody {
    fn check(
        &self,
        content_type: Option<&str>,
        body: &[u8],
        violations: &mut Vec<ValidationViolation>,
    ) {
        if body.iter().all(u8::is_ascii_whitespace) {
            if self.required {
                violations.push(ValidationViolation::new("body", "request body is required"));
            }
            return;
        }

        if !is_json(content_type) {
            violations.push(ValidationViolation::new(
                "header.content-type",
                format!(
                    "expected application/json, got {}",
                    content_type.unwrap_or("none")
                ),
            ));
            return;
        }

        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                violations.push(ValidationViolation::new(
                    "body",
                    format!("malformed JSON: {e}"),
                ));
                return;
            }
        };

        if let Some(schema) = &self.schema {
            violations.extend(schema.violations(&value, "body"));
        }
    }
}

fn compile_path_item(
    document: &Value,
    components: Option<&Value>,
    template: &str,
    item: &Value,
) -> Result<Vec<Operation>, ContractError> {
    let shared_params = item
        .get("parameters")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut operations = Vec::new();
    for method in METHODS {
        let Some(op) = item.get(method) else {
            continue;
        };
        let location = format!("{} {template}", method.to_ascii_uppercase());

        let mut parameters: Vec<Parameter> = Vec::new();
        let op_params = op
            .get("parameters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        // Operation-level parameters override path-level ones with the same name and location.
        for raw in shared_params.iter().chain(op_params) {
            let param = compile_parameter(document, components, raw, &location)?;
            if let Some(param) = param {
                parameters.retain(|p| !(p.name == param.name && p.location == param.location));
                parameters.push(param);
            }
        }

        let request_body = op
            .get("requestBody")
            .map(|raw| compile_request_body(document, components, raw, &location))
            .transpose()?;

        let mut responses = HashMap::new();
        if let Some(raw_responses) = op.get("responses").and_then(Value::as_object) {
            for (status, raw) in raw_responses {
                let declared = compile_response(
                    document,
                    components,
                    raw,
                    &format!("{location} response {status}"),
                )?;
                responses.insert(status.to_ascii_uppercase(), declared);
            }
        }

        operations.push(Operation {
            method: method.to_ascii_uppercase(),
            path: template.to_owned(),
            operation_id: op
                .get("operationId")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
            parameters,
            request_body,
            responses,
        });
    }
    Ok(operations)
}

fn compile_parameter(
    document: &Value,
    components: Option<&Value>,
    raw: &Value,
    location: &str,
) -> Result<Option<Parameter>, ContractError> {
    let raw = resolve(document, raw)?;
    let Some(name) = raw.get("name").and_then(Value::as_str) else {
        return Ok(None);
    };
    // Cookie parameters are not checked.
    let Some(param_location) = raw.get("in").and_then(Value::as_str).and_then(ParamLocation::parse)
    else {
        return Ok(None);
    };

    let required = param_location == ParamLocation::Path
        || raw.get("required").and_then(Value::as_bool).unwrap_or(false);
    let schema = raw
        .get("schema")
        .map(|s| {
            CompiledSchema::compile(
                s,
                components,
                &format!("{location} parameter {name}"),
            )
        })
        .transpose()?;

    Ok(Some(Parameter {
        name: name.to_owned(),
        location: param_location,
        required,
        schema,
    }))
}

fn compile_request_body(
    document: &Value,
    components: Option<&Value>,
    raw: &Value,
    location: &str,
) -> Result<RequestBody, ContractError> {
    let raw = resolve(document, raw)?;
    let required = raw.get("required").and_then(Value::as_bool).unwrap_or(false);
    let schema = json_media_schema(raw)
        .map(|s| CompiledSchema::compile(s, components, &format!("{location} request body")))
        .transpose()?;
    Ok(RequestBody { required, schema })
}

fn compile_response(
    document: &Value,
    components: Option<&Value>,
    raw: &Value,
    location: &str,
) -> Result<DeclaredResponse, ContractError> {
    let raw = resolve(document, raw)?;
    let declares_content = raw
        .get("content")
        .and_then(Value::as_object)
        .is_some_and(|c| !c.is_empty());
    let schema = json_media_schema(raw)
        .map(|s| CompiledSchema::compile(s, components, location))
        .transpose()?;
    Ok(DeclaredResponse {
        declares_content,
        schema,
    })
}

/// Schema of the first JSON media type under `content`.
fn json_media_schema(raw: &Value) -> Option<&Value> {
    raw.get("content")?
        .as_object()?
        .iter()
        .find(|(media, _)| is_json(Some(media)))
        .and_then(|(_, media)| media.get("schema"))
}

/// Follows local `$ref` chains (`#/components/...`) to the referenced node.
fn resolve<'d>(document: &'d Value, mut node: &'d Value) -> Result<&'d Value, ContractError> {
    for _ in 0..MAX_REF_DEPTH {
        let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
            return Ok(node);
        };
        node = reference
            .strip_prefix('#')
            .and_then(|pointer| document.pointer(pointer))
            .ok_or_else(|| ContractError::UnresolvedRef(reference.to_owned()))?;
    }
    Err(ContractError::UnresolvedRef(
        "reference chain is too deep".to_owned(),
    ))
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .is_some_and(|essence| {
            essence.eq_ignore_ascii_case("application/json") || essence.ends_with("+json")
        })
}

fn lookup_pair<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn parse_query(
    query: Option<&str>,
    violations: &mut Vec<ValidationViolation>,
) -> Vec<(String, String)> {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        return Vec::new();
    };
    serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_else(|e| {
        violations.push(ValidationViolation::new(
            "query",
            format!("malformed query string: {e}"),
        ));
        Vec::new()
    })
}
