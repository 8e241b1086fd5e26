use cfg_if::cfg_if;

// boilerplate to run in different modes
cfg_if! {
    // server-only stuff
    if #[cfg(feature = "ssr")] {
        use std::net::SocketAddr;

        use anyhow::Context;
        use actix_files::Files;
        use actix_web::*;
        use clap::Parser;
        use leptos::config::get_configuration;
        use leptos_actix::{generate_route_list, LeptosRoutes};
        use vitrine::routes::app::{shell, Site};

        #[derive(Parser)]
        #[command(name = "Vitrine")]
        #[command(about = "Marketing site with light and dark themes")]
        struct Args {
            #[arg(short='H', long="http_host", value_name = "HTTP_HOST", default_value="[::]:3000")]
            http_host: SocketAddr,
            #[arg(short='c', long="config", value_name = "LEPTOS_TOML", default_value="vitrine/leptos.toml")]
            config: String,
        }

        #[actix_web::main]
        async fn main() -> anyhow::Result<()> {
            if std::env::var("RUST_LOG").is_err() {
                std::env::set_var("RUST_LOG", "info");
            }
            pretty_env_logger::init();

            let args = Args::parse();

            let mut conf = get_configuration(Some(&args.config)).context("failed to read leptos config")?;
            conf.leptos_options.site_addr = args.http_host;
            let addr = conf.leptos_options.site_addr;
            let routes = generate_route_list(Site);
            log::info!("Starting vitrine server at: {addr}");
            HttpServer::new(move || {
                let leptos_options = conf.leptos_options.clone();
                let site_root = leptos_options.site_root.clone();
                App::new()
                    // serve JS/WASM/CSS from `pkg`
                    .service(Files::new("/pkg", format!("{site_root}/pkg")))
                    // serve other assets from the `static` directory
                    .service(Files::new("/assets", format!("{site_root}/static")))
                    .service(favicon)
                    .leptos_routes(routes.clone(), {
                        let leptos_options = leptos_options.clone();
                        move || shell(leptos_options.clone())
                    })
                    .app_data(web::Data::new(leptos_options))
                    .wrap(middleware::Logger::new("%t -- %a %s %U"))
            })
            .bind(&addr)?
            .run()
            .await
            .context("server failed")
        }

        #[actix_web::get("favicon.ico")]
        async fn favicon(
            leptos_options: web::Data<leptos::config::LeptosOptions>,
        ) -> actix_web::Result<actix_files::NamedFile> {
            let leptos_options = leptos_options.into_inner();
            let site_root = &leptos_options.site_root;
            Ok(actix_files::NamedFile::open(format!(
                "{site_root}/static/favicon.ico"
            ))?)
        }
    }

    // client-only main
    else {
        pub fn main() {
            // the browser build starts from `hydrate` or `enhance` in lib.rs
        }
    }
}
