//! SPARQL templates for the triple-store backends (GeneLab entity lookups
//! and the geospatial/SDoH graph).
//!
//! The triple-store interface takes query text with named `?placeholder`
//! slots filled by string substitution before submission. That is the
//! interface contract, not a choice, so [`substitute`] compensates: every
//! substituted value is rejected if it could escape its quoted literal,
//! and the resolver only feeds it normalizer-validated identifiers.

use crate::error::{IntegrationError, Result};
use crate::registry::EntityDescriptor;

/// Common prefixes shared by all templates.
pub const PREFIXES: &str = "\
PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX schema: <https://purl.org/okn/frink/kg/spoke-okn/schema/>
PREFIX biolink: <https://w3id.org/biolink/vocab/>
";

/// Node-existence query for one entity type: which of `?id_list` exist
/// under the type's class and lookup predicate.
pub fn find_nodes(desc: &EntityDescriptor) -> String {
    format!(
        "{PREFIXES}\n\
         SELECT DISTINCT ?id WHERE {{\n\
           ?node a schema:{label} ;\n\
                 schema:{key} ?id .\n\
           FILTER(?id IN ?id_list)\n\
         }}",
        label = desc.genelab_label,
        key = desc.genelab_key,
    )
}

/// Disease prevalence observations by administrative location.
pub const DISEASE_PREVALENCE_BY_LOCATION: &str = "\
SELECT DISTINCT ?disease_name ?location_name ?prevalence ?year WHERE {
  ?stmt rdf:subject ?disease ;
        rdf:predicate schema:PREVALENCE_DpL ;
        rdf:object ?location ;
        schema:value ?prevalence ;
        schema:year ?year .
  ?disease rdfs:label ?disease_name .
  ?location rdfs:label ?location_name .
  FILTER(CONTAINS(LCASE(?disease_name), LCASE(?disease_query)))
  FILTER(CONTAINS(LCASE(?location_name), LCASE(?location_query)))
}
ORDER BY DESC(?year) ?disease_name
LIMIT ?limit";

/// Social-determinants-of-health observations by location.
pub const SDOH_BY_LOCATION: &str = "\
SELECT DISTINCT ?sdoh_name ?location_name ?value ?variable ?year WHERE {
  ?stmt rdf:subject ?sdoh ;
        rdf:predicate schema:PREVALENCEIN_SpL ;
        rdf:object ?location ;
        schema:value ?value ;
        schema:variable ?variable ;
        schema:year ?year .
  ?sdoh rdfs:label ?sdoh_name .
  ?location rdfs:label ?location_name .
  FILTER(CONTAINS(LCASE(?location_name), LCASE(?location_query)))
}
ORDER BY DESC(?year) ?sdoh_name
LIMIT ?limit";

/// A value bound into a SPARQL template.
#[derive(Debug, Clone)]
pub enum SparqlValue {
    Str(String),
    List(Vec<String>),
    Int(i64),
}

/// Fill `?name` placeholders in a template.
///
/// Lists render as a parenthesized quoted list, strings as quoted
/// literals, integers bare.
///
/// # Errors
///
/// `IntegrationError::QueryBuild` when any string value contains a quote,
/// backslash, or newline.
pub fn substitute(template: &str, params: &[(&str, SparqlValue)]) -> Result<String> {
    let mut query = if template.contains("PREFIX ") {
        template.to_string()
    } else {
        format!("{PREFIXES}\n{template}")
    };

    for (name, value) in params {
        let placeholder = format!("?{name}");
        let rendered = match value {
            SparqlValue::Str(s) => quote(s)?,
            SparqlValue::List(items) => {
                let quoted: Vec<String> =
                    items.iter().map(|s| quote(s)).collect::<Result<_>>()?;
                format!("({})", quoted.join(", "))
            }
            SparqlValue::Int(n) => n.to_string(),
        };
        query = query.replace(&placeholder, &rendered);
    }

    Ok(query)
}

fn quote(s: &str) -> Result<String> {
    if s.contains('"') || s.contains('\\') || s.contains('\n') || s.contains('\r') {
        return Err(IntegrationError::QueryBuild(format!(
            "value {s:?} cannot be safely quoted"
        )));
    }
    Ok(format!("\"{s}\""))
}
