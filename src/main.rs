use anyhow::Context;
use clap::Parser;
use place_listings::core::ConfigProvider;
use place_listings::utils::error::{ErrorCategory, PlacesError};
use place_listings::utils::{logger, validation::Validate};
use place_listings::{
    CliConfig, Command, NewPlace, Place, PlacesService, ReqwestHttpClient, StaticIdentity,
    TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let result = match &cli.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            run(&config, &cli).await
        }
        None => run(&cli, &cli).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.category() {
            ErrorCategory::Configuration => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Auth => 4,
            ErrorCategory::Network | ErrorCategory::Data => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run<C>(config: &C, cli: &CliConfig) -> Result<(), PlacesError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;

    let http = ReqwestHttpClient::from_config(config)?;
    let identity = StaticIdentity::from_config(config);
    tracing::info!("Using store {}", http.base_url());

    let service = PlacesService::new(http, identity)
        .with_collection(config.collection())
        .with_placeholder_image(config.placeholder_image_url());

    match &cli.command {
        Command::List => {
            let places = service.fetch_places().await?;
            print_places(&places, cli.json)?;
        }
        Command::Get { id } => {
            let place = service.get_place(id).await?;
            print_places(std::slice::from_ref(&place), cli.json)?;
        }
        Command::Create {
            title,
            description,
            price,
            from,
            to,
        } => {
            let place = service
                .add_place(NewPlace {
                    title: title.clone(),
                    description: description.clone(),
                    price: *price,
                    available_from: *from,
                    available_to: *to,
                })
                .await?;
            print_places(std::slice::from_ref(&place), cli.json)?;
        }
        Command::Update {
            id,
            title,
            description,
        } => {
            service.ensure_loaded().await?;
            let place = service.update_place(id, title, description).await?;
            print_places(std::slice::from_ref(&place), cli.json)?;
        }
    }

    Ok(())
}

fn print_places(places: &[Place], json: bool) -> Result<(), PlacesError> {
    if json {
        println!("{}", serde_json::to_string_pretty(places)?);
        return Ok(());
    }

    if places.is_empty() {
        println!("No places found");
    }
    for place in places {
        println!(
            "{}  {}  {:.2}  {} to {}  (owner {})",
            place.id,
            place.title,
            place.price,
            place.available_from.format("%Y-%m-%d"),
            place.available_to.format("%Y-%m-%d"),
            place.owner_id
        );
    }
    Ok(())
}
