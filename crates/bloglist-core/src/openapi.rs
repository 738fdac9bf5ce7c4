//! OpenAPI schema utilities for merging the documentation of several plugins

use utoipa::openapi::OpenApi;

/// Merges `schemas` into `base`.
///
/// Paths, component schemas, responses, security schemes and tags are combined.
/// Entries from later schemas replace entries of the same name in `base`.
pub fn merge_openapi_schemas(mut base: OpenApi, schemas: Vec<OpenApi>) -> OpenApi {
    for schema in schemas {
        base.paths.paths.extend(schema.paths.paths);

        if let Some(components) = schema.components {
            let base_components = base.components.get_or_insert_with(Default::default);
            base_components.schemas.extend(components.schemas);
            base_components.responses.extend(components.responses);
            base_components
                .security_schemes
                .extend(components.security_schemes);
        }

        if let Some(tags) = schema.tags {
            let base_tags = base.tags.get_or_insert_with(Vec::new);
            for tag in tags {
                if !base_tags.iter().any(|existing| existing.name == tag.name) {
                    base_tags.push(tag);
                }
            }
        }

        if let Some(security) = schema.security {
            base.security.get_or_insert_with(Vec::new).extend(security);
        }
    }

    base
}
