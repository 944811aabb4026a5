use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::ContactFeatureConfig;
use types::{ContactFeature, Email, HealthFeature, RestServer, Template};

pub mod types;

/// Wire the services behind the REST API. The email service is shared by all
/// features and never changes after startup.
pub fn rest_server(config: &Config, email: Email) -> anyhow::Result<RestServer> {
    let template = Template::new()?;

    let contact = ContactFeature::new(
        email.clone(),
        template,
        ContactFeatureConfig {
            recipient: config.contact.email.clone().into(),
        },
    );

    let health = HealthFeature::new(email);

    Ok(RestServer::new(
        health,
        contact,
        RestServerConfig {
            host: config.http.host,
            port: config.http.port,
        },
    ))
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, path::Path};

    use folio_config::DEFAULT_CONFIG_PATH;
    use folio_email_impl::TransportConfig;

    use super::*;

    #[test]
    fn provide_rest_server() {
        let config =
            folio_config::load_paths(&[Path::new(DEFAULT_CONFIG_PATH)], Some(HashMap::new()))
                .unwrap();
        let email = Email::new(TransportConfig::Unconfigured { simulate: true }).unwrap();

        rest_server(&config, email).unwrap();
    }
}
