use std::path::Path;

use anyhow::Context;

use crate::cli::{Cli, Commands, player, render};
use crate::config::Config;
use crate::core::academy::Academy;
use crate::core::avatar::CropRect;
use crate::core::catalog;
use crate::core::checkout::Checkout;
use crate::core::password_reset::{PasswordReset, ResetStep};
use crate::core::player::LessonPlayer;
use crate::core::profile::ProfileForm;
use crate::model::payment::PaymentResponse;
use crate::utils::input::{input, input_password};

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config().context("invalid configuration")?;
    let academy = Academy::new(&config).context("failed to build HTTP client")?;

    match cli.command {
        Commands::Courses { search, category } => {
            courses(&academy, search.as_deref(), category.as_deref()).await
        }
        Commands::Search { query } => search(&academy, &query).await,
        Commands::Course { id } => course(&academy, &id).await,
        Commands::Dashboard => dashboard(&academy).await,
        Commands::Status => status(&academy).await,
        Commands::Login { email } => login(&academy, email).await,
        Commands::Signup { name, email } => signup(&academy, name, email).await,
        Commands::Logout => logout(&academy).await,
        Commands::ForgotPassword => forgot_password(&academy).await,
        Commands::Profile => profile(&academy).await,
        Commands::ProfileEdit {
            name,
            email,
            avatar,
            crop,
        } => profile_edit(&academy, name, email, avatar.as_deref(), crop).await,
        Commands::Certificates => certificates(&academy).await,
        Commands::Player { course_id } => lesson_player(&academy, &course_id).await,
        Commands::Pay { course_id } => pay(&academy, &config, &course_id).await,
    }
}

fn prompt_or(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Ok(input(prompt)?),
    }
}

async fn courses(
    academy: &Academy,
    term: Option<&str>,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let all = match academy.list_courses().await {
        Ok(courses) => courses,
        Err(err) => {
            log::error!("failed to fetch courses: {}", err);
            println!("Something went wrong while loading courses.");
            return Ok(());
        }
    };

    let mut shown = catalog::filter_by_title(&all, term.unwrap_or(""));
    if let Some(slug) = category {
        shown.retain(|c| catalog::in_category(c, slug));
    }

    println!("Course Catalog\n");
    if shown.is_empty() {
        println!("No courses found.");
    } else {
        println!("{}", render::course_list(&shown, academy.base_url()));
    }
    Ok(())
}

async fn search(academy: &Academy, query: &str) -> anyhow::Result<()> {
    let results = match academy.search_courses(query).await {
        Ok(results) => results,
        Err(err) => {
            log::error!("search error: {}", err);
            Vec::new()
        }
    };

    println!("Search Results\n");
    if results.is_empty() {
        println!("No courses found for \"{}\".", query.trim());
    } else {
        let refs: Vec<_> = results.iter().collect();
        println!("{}", render::course_list(&refs, academy.base_url()));
    }
    Ok(())
}

async fn course(academy: &Academy, id: &str) -> anyhow::Result<()> {
    let course = match academy.get_course(id).await {
        Ok(course) => course,
        Err(err) => {
            log::error!("error loading course {}: {}", id, err);
            println!("Course not found.");
            return Ok(());
        }
    };
    let logged_in = academy
        .auth_status()
        .await
        .map(|s| s.is_logged_in)
        .unwrap_or_else(|err| {
            log::error!("error checking auth status: {}", err);
            false
        });
    let target = catalog::buy_now_target(&course.id, logged_in);
    println!("{}", render::course_detail(&course, academy.base_url(), &target));
    Ok(())
}

async fn dashboard(academy: &Academy) -> anyhow::Result<()> {
    println!("My Dashboard\n");
    match academy.enrolled_courses().await {
        Ok(courses) if courses.is_empty() => {
            println!("You are not enrolled in any courses yet. Run `academy courses` to explore.")
        }
        Ok(courses) => {
            let refs: Vec<_> = courses.iter().collect();
            println!("{}", render::course_list(&refs, academy.base_url()));
        }
        Err(err) => {
            log::error!("failed to fetch enrolled courses: {}", err);
            println!("Failed to fetch enrolled courses.");
        }
    }
    Ok(())
}

async fn status(academy: &Academy) -> anyhow::Result<()> {
    let status = academy.auth_status().await?;
    match (status.is_logged_in, status.user) {
        (true, Some(user)) => println!("Signed in as {} <{}>", user.name, user.email),
        (true, None) => println!("Signed in."),
        (false, _) => println!("Not signed in."),
    }
    Ok(())
}

async fn login(academy: &Academy, email: Option<String>) -> anyhow::Result<()> {
    let email = prompt_or(email, "Email address: ")?;
    let password = input_password("Password: ")?;

    match academy.login(&email, &password).await {
        Ok(()) => println!("Signed in. Run `academy dashboard` to see your courses."),
        Err(err) => {
            log::error!("login failed: {}", err);
            println!("{}", err.user_message("Something went wrong. Please try again."));
        }
    }
    Ok(())
}

async fn signup(
    academy: &Academy,
    name: Option<String>,
    email: Option<String>,
) -> anyhow::Result<()> {
    let name = prompt_or(name, "Full Name: ")?;
    let email = prompt_or(email, "Email address: ")?;
    let password = input_password("Password: ")?;

    match academy.signup(&name, &email, &password).await {
        Ok(()) => println!("Account created."),
        Err(err) => {
            log::error!("signup failed: {}", err);
            println!("{}", err.user_message("Signup failed."));
        }
    }
    Ok(())
}

async fn logout(academy: &Academy) -> anyhow::Result<()> {
    match academy.logout().await {
        Ok(()) => println!("Signed out."),
        Err(err) => log::error!("logout failed: {}", err),
    }
    Ok(())
}

async fn forgot_password(academy: &Academy) -> anyhow::Result<()> {
    let mut flow = PasswordReset::new();
    while flow.step() != ResetStep::Done {
        println!("{}", flow.step().prompt());
        let value = match flow.step() {
            ResetStep::Email => input("Email: ")?,
            ResetStep::Otp => input("Enter OTP: ")?,
            _ => input_password("New Password: ")?,
        };
        flow.submit(academy, &value).await;
        if let Some(message) = flow.error() {
            println!("{}", message);
        }
    }
    println!("{}", ResetStep::Done.prompt());
    Ok(())
}

async fn profile(academy: &Academy) -> anyhow::Result<()> {
    println!("My Profile\n");
    match academy.profile().await {
        Ok((user, certificates)) => {
            println!("{}", render::profile(user.as_ref(), &certificates, academy.base_url()))
        }
        Err(err) => log::error!("failed to load profile data: {}", err),
    }
    Ok(())
}

async fn profile_edit(
    academy: &Academy,
    name: Option<String>,
    email: Option<String>,
    avatar: Option<&Path>,
    crop: Option<CropRect>,
) -> anyhow::Result<()> {
    let user = match academy.current_user().await {
        Ok(Some(user)) => user,
        Ok(None) => {
            println!("Please sign in to edit your profile.");
            return Ok(());
        }
        Err(err) => {
            log::error!("failed to load user: {}", err);
            println!("Could not load your profile.");
            return Ok(());
        }
    };
    let Some(user_id) = user.id.clone() else {
        anyhow::bail!("backend did not return a user id");
    };

    let mut form = ProfileForm::from_user(&user);
    if let Some(name) = name {
        form.name = name;
    }
    if let Some(email) = email {
        form.email = email;
    }
    if let Some(path) = avatar {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        if let Err(err) = form.set_avatar(&bytes, crop) {
            log::error!("avatar crop failed: {}", err);
            println!("Could not crop the image: {}", err.user_message("unsupported image"));
            return Ok(());
        }
    }

    let multipart = match form.into_multipart() {
        Ok(multipart) => multipart,
        Err(err) => {
            println!("{}", err.user_message("Invalid input."));
            return Ok(());
        }
    };

    match academy.update_profile(&user_id, multipart).await {
        Ok(()) => println!("Profile Updated. Your changes have been saved."),
        Err(err) => {
            log::error!("profile update failed: {}", err);
            println!("Update Failed. There was a problem saving your changes.");
        }
    }
    Ok(())
}

async fn certificates(academy: &Academy) -> anyhow::Result<()> {
    match academy.certificates().await {
        Ok(certificates) => {
            println!("{}", render::certificate_list(&certificates, academy.base_url()))
        }
        Err(err) => log::error!("failed to load certificates: {}", err),
    }
    Ok(())
}

async fn lesson_player(academy: &Academy, course_id: &str) -> anyhow::Result<()> {
    let course = match academy.get_course(course_id).await {
        Ok(course) => course,
        Err(err) => {
            log::error!("error loading course {}: {}", course_id, err);
            println!("Course not found.");
            return Ok(());
        }
    };

    let mut lesson_player = LessonPlayer::new(course);
    lesson_player.load(academy).await;
    player::run(academy, &mut lesson_player).await;
    Ok(())
}

async fn pay(academy: &Academy, config: &Config, course_id: &str) -> anyhow::Result<()> {
    let checkout = match Checkout::load(academy, course_id).await {
        Ok(checkout) => checkout,
        Err(err) => {
            log::error!("failed to load checkout details: {}", err);
            println!("Failed to load details.");
            return Ok(());
        }
    };
    if checkout.user.is_none() {
        println!(
            "Please sign in first: {}",
            catalog::buy_now_target(&checkout.course.id, false)
        );
        return Ok(());
    }

    println!(
        "{}  {}",
        checkout.course.title,
        catalog::format_price(checkout.course.price.as_deref().unwrap_or("0"))
    );

    let options = match checkout.start(academy, &config.razorpay_key_id).await {
        Ok(options) => options,
        Err(err) => {
            log::error!("failed to create order: {}", err);
            println!("Payment failed to start.");
            return Ok(());
        }
    };
    println!("Open the payment gateway checkout with these options:");
    println!("{}", serde_json::to_string_pretty(&options)?);

    let payment = PaymentResponse {
        razorpay_order_id: options.order_id.clone(),
        razorpay_payment_id: input("razorpay_payment_id: ")?,
        razorpay_signature: input("razorpay_signature: ")?,
    };

    match checkout.confirm(academy, &payment).await {
        Ok(()) => println!("Payment successful & enrolled! Run `academy dashboard`."),
        Err(err) => {
            log::error!("payment verification failed: {}", err);
            println!("Payment verification failed.");
        }
    }
    Ok(())
}
