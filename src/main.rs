use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use shortlet::api::{HttpApi, RentalApi};
use shortlet::booking::{BookingFlow, BookingForm, BookingHistory, StatusFilter};
use shortlet::catalog::{self, Catalog, CatalogFilters, PriceRange};
use shortlet::detail::PropertyDetail;
use shortlet::favorites::Favorites;
use shortlet::models::{PaymentMethod, ProfileUpdate, PropertyId};
use shortlet::notifications::{self, NotificationCenter};
use shortlet::{profile, AppError, Config};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shortlet", version, about = "Browse, book and manage short-let properties")]
struct Cli {
    /// Base URL of the rental API (overrides SHORTLET_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (overrides SHORTLET_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search listings
    Properties {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = catalog::DEFAULT_LOCATION)]
        location: String,
        #[arg(long, default_value = "₦200-₦500")]
        price: PriceRange,
        #[arg(long = "type", default_value = catalog::DEFAULT_PROPERTY_TYPE)]
        property_type: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Let the server page the results instead of fetching every match
        #[arg(long)]
        server_paging: bool,
    },
    /// Show one listing, optionally with a price for a stay
    Property {
        id: PropertyId,
        #[arg(long)]
        check_in: Option<NaiveDate>,
        #[arg(long)]
        check_out: Option<NaiveDate>,
    },
    /// List favorites
    Favorites,
    /// Add or remove a favorite
    Favorite { id: PropertyId },
    /// Book a property and get the payment link
    Book {
        property: PropertyId,
        #[arg(long)]
        check_in: Option<NaiveDate>,
        #[arg(long)]
        check_out: Option<NaiveDate>,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, default_value = "flutterwave")]
        payment: PaymentMethod,
    },
    /// List bookings, optionally by status
    Bookings {
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Read and clear notifications
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationAction>,
    },
    /// Show or update the profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
}

#[derive(Subcommand)]
enum NotificationAction {
    /// Mark one notification as read
    Read { id: u64 },
    /// Mark every notification as read
    ReadAll,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api_url = url;
    }
    if cli.token.is_some() {
        config.api_token = cli.token.clone();
    }

    let api = HttpApi::new(&config).context("Failed to create HTTP client")?;
    info!("Using API at {}", config.api_url);

    let result = run(cli.command, &api, &config).await;
    if let Err(e) = &result {
        error!("{}", e);
        eprintln!("{}", e.notice());
    }
    Ok(ExitCode::from(exit_status(&result)))
}

/// 0 on success, 1 once a failure notice has been printed
fn exit_status(result: &Result<(), AppError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

async fn run(command: Command, api: &HttpApi, config: &Config) -> Result<(), AppError> {
    let authenticated = api.is_authenticated();

    match command {
        Command::Properties {
            search,
            location,
            price,
            property_type,
            page,
            server_paging,
        } => {
            let filters = CatalogFilters {
                search,
                location,
                price_range: price,
                property_type,
                page: 1,
            };
            let mut catalog = if server_paging {
                Catalog::server_paged(filters)
            } else {
                Catalog::new(filters)
            };
            catalog.search(api).await?;

            let mut favorites = Favorites::new();
            if authenticated {
                // Cards still render without favorites.
                let _ = favorites.load(api).await;
            }

            let shown = catalog.go_to(api, page).await?;
            for (i, card) in catalog.cards(favorites.ids()).iter().enumerate() {
                let heart = if card.is_favorite { " ♥" } else { "" };
                println!("{}. {} ({}){}", i + 1, card.title, card.price, heart);
                println!("   {}, {}, {}", card.address, card.area, card.city);
                println!("   {} beds, {} baths, {}", card.beds, card.baths, card.size);
                println!("   ID: {}", card.id);
                println!();
            }
            println!("Page {} of {}", shown, catalog.pager().total_pages());
        }

        Command::Property { id, check_in, check_out } => {
            let detail = PropertyDetail::load(api, id).await?;
            let p = &detail.property;
            println!("{} ({} per night)", p.title, p.nightly_price()?);
            println!("   {}", p.location);
            println!("   {} beds, {} baths, {} m²", p.bedrooms, p.bathrooms, p.area);
            println!("   Available: {}", if p.is_available { "yes" } else { "no" });
            if !p.features.is_empty() {
                println!("   Features: {}", p.features.join(", "));
            }
            for (i, item) in detail.gallery.thumbnails().iter().enumerate() {
                println!("   Media {}: {}", i + 1, item.url());
            }

            if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
                let quote = detail.stay_quote(check_in, check_out, config.tax_rate)?;
                println!();
                println!("{:<28}{}", quote.nights_label(), quote.base);
                println!("{:<28}{}", quote.tax_label(), quote.tax);
                println!("{:<28}{}", "Total", quote.total);
            }

            let listing = api.list_properties(&CatalogFilters::default().to_query()).await;
            if let Ok(page) = listing {
                let others = catalog::similar(&page.results, id);
                if !others.is_empty() {
                    println!();
                    println!("Similar properties:");
                    for other in others {
                        println!("   {} ({})", other.title, other.id);
                    }
                }
            }
        }

        Command::Favorites => {
            let favorites = api.list_favorites().await?;
            for fav in &favorites {
                println!("{} ({}) - {}", fav.property.title, fav.property.id, fav.property.location);
            }
            info!("{} favorites", favorites.len());
        }

        Command::Favorite { id } => {
            let mut favorites = Favorites::new();
            let now_favorite = favorites.toggle(api, authenticated, id).await?;
            println!("{}", if now_favorite { "Added to favorites" } else { "Removed from favorites" });
        }

        Command::Book {
            property,
            check_in,
            check_out,
            guests,
            name,
            email,
            phone,
            payment,
        } => {
            if !authenticated {
                return Err(shortlet::ValidationError::LoginRequired.into());
            }
            let mut form = match profile::fetch_profile(api).await {
                Ok(me) => BookingForm::prefilled(property, &me),
                Err(_) => BookingForm::new(property),
            };
            form.check_in = check_in;
            form.check_out = check_out;
            form.guests = guests;
            form.payment_method = payment;
            if let Some(name) = name {
                form.full_name = name;
            }
            if let Some(email) = email {
                form.email = email;
            }
            if let Some(phone) = phone {
                form.phone = phone;
            }
            form.validate()?;

            let listing = api.get_property(property).await?;
            let nightly = listing.nightly_price()?;
            let confirmation = BookingFlow::new().submit(api, &form, nightly, config.tax_rate).await?;

            let b = &confirmation.breakdown;
            println!("Booking {} for {}", confirmation.booking.id, listing.title);
            println!("{:<28}{}", b.nights_label(), b.base);
            println!("{:<28}{}", b.tax_label(), b.tax);
            println!("{:<28}{}", "Total", b.total);
            println!();
            println!("Complete payment at: {}", confirmation.payment_link);
        }

        Command::Bookings { status } => {
            let history = BookingHistory::load(api).await?;
            for b in history.filtered(status) {
                println!(
                    "#{} property {}: {} to {} ({} guests) {} [{}]",
                    b.id, b.property, b.check_in, b.check_out, b.guests, b.total_price, b.status
                );
            }
        }

        Command::Notifications { action } => {
            let mut center = NotificationCenter::default();
            match action {
                Some(NotificationAction::Read { id }) => center.mark_as_read(api, id).await?,
                Some(NotificationAction::ReadAll) => center.mark_all_as_read(api).await?,
                None => {}
            }
            center.refresh(api).await?;

            let now = Utc::now();
            for n in center.notifications() {
                let marker = if n.is_read { " " } else { "*" };
                println!("{} {} ({})", marker, n.title, notifications::when(n.created_at, now));
                println!("    {}", n.message);
            }
            if let Some(badge) = center.badge() {
                println!("{} unread", badge);
            }
        }

        Command::Profile { name, email, phone } => {
            let current = profile::fetch_profile(api).await?;
            let me = if name.is_some() || email.is_some() || phone.is_some() {
                let update = ProfileUpdate {
                    name: name.unwrap_or(current.name),
                    email: email.unwrap_or(current.email),
                    phone: phone.or(current.phone),
                };
                profile::update_profile(api, update).await?
            } else {
                current
            };
            println!("{}", me.name);
            println!("   {}", me.email);
            if let Some(phone) = &me.phone {
                println!("   {}", phone);
            }
        }
    }

    Ok(())
}
