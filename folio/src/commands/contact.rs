use anyhow::bail;
use clap::Subcommand;
use folio_client::{ContactForm, HttpContactApi, SubmitError, Toast};
use folio_config::Config;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a message through the contact endpoint
    Send {
        /// Defaults to the contact endpoint of the configured http server
        #[arg(long)]
        endpoint: Option<Url>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                endpoint,
                name,
                email,
                message,
            } => {
                let endpoint = match endpoint {
                    Some(endpoint) => endpoint,
                    None => default_endpoint(&config)?,
                };
                send(endpoint, ContactForm::with_values(name, email, message)).await
            }
        }
    }
}

fn default_endpoint(config: &Config) -> anyhow::Result<Url> {
    let addr = std::net::SocketAddr::from((config.http.host, config.http.port));
    Ok(format!("http://{addr}/api/contact").parse()?)
}

async fn send(endpoint: Url, mut form: ContactForm) -> anyhow::Result<()> {
    let api = HttpContactApi::new(endpoint);

    match form.submit(&api).await {
        Ok(Toast::Success(message)) => {
            println!("{message}");
            Ok(())
        }
        Ok(Toast::Failure(message)) => bail!("{message}"),
        Err(SubmitError::Invalid(violations)) => {
            for violation in &violations {
                eprintln!("{}: {}", violation.path.join("."), violation.message);
            }
            bail!("Invalid form data")
        }
        Err(SubmitError::Busy) => bail!("Another submission is still in flight"),
    }
}
