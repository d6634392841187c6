use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, post, put, web, App, HttpResponse, HttpServer, Responder};

use serde::Deserialize;
use token_gen_core::engine::language::LanguageRegistry;
use token_gen_core::engine::settings::Settings;
use token_gen_core::engine::token_engine::{PlacementInput, TokenEngine};

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	language: Option<String>, // registered key, "random", or absent
	min: Option<usize>,
	max: Option<usize>,
}

#[derive(Deserialize)]
struct LanguageQuery {
	names: Option<String>,
}

#[derive(Deserialize)]
struct ResetParams {
	scene: String,
	/// Comma-separated actor ids to reseed at 0.
	reseed: Option<String>,
}

struct SharedData {
	engine: TokenEngine,
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one standalone name from a loaded language.
/// Returns the generated name as the response body.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let min = query.min.unwrap_or(6);
	let max = query.max.unwrap_or(9);

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.engine.generate_name(query.language.as_deref(), min, max) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => HttpResponse::InternalServerError().body(e),
	}
}

#[get("/v1/languages")]
async fn get_languages() -> impl Responder {
	match LanguageRegistry::available_in("./data") {
		Ok(keys) => HttpResponse::Ok().body(keys.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list languages"),
	}
}

#[get("/v1/loaded_languages")]
async fn get_loaded_languages(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};
	HttpResponse::Ok().body(shared_data.engine.languages().loaded_keys().join("\n"))
}

#[put("/v1/load_languages")]
async fn put_languages(data: web::Data<Mutex<SharedData>>, query: web::Query<LanguageQuery>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty language name"),
	};

	let language_names: Vec<&str> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.collect();

	let mut registry = LanguageRegistry::new();
	for name in language_names {
		registry.register(name, format!("./data/{}.json", name).into());
		if let Err(e) = registry.get_or_load(name) {
			return HttpResponse::InternalServerError().body(format!("Failed to load language: {e}"));
		}
	}
	shared_data.engine.set_languages(registry);

	HttpResponse::Ok().body("Languages loaded successfully")
}

/// HTTP POST endpoint `/v1/place`
///
/// Runs one placement intent through the engine and returns the
/// partial record patch as JSON.
#[post("/v1/place")]
async fn post_place(data: web::Data<Mutex<SharedData>>, input: web::Json<PlacementInput>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	match shared_data.engine.place_token(&input) {
		Ok(patch) => HttpResponse::Ok().json(patch),
		Err(e) => HttpResponse::InternalServerError().body(e),
	}
}

#[post("/v1/reset_counters")]
async fn post_reset(data: web::Data<Mutex<SharedData>>, query: web::Query<ResetParams>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Engine lock failed"),
	};

	let reseed: Option<Vec<String>> = query.reseed.as_ref().map(|actors| {
		actors
			.split(',')
			.map(|s| s.trim().to_owned())
			.filter(|s| !s.is_empty())
			.collect()
	});

	shared_data.engine.reset_counters(&query.scene, reseed.as_deref());
	HttpResponse::Ok().body("Counters reset")
}

/// Main entry point for the server.
///
/// Builds an engine with default settings and an empty registry,
/// wraps it in a `Mutex` for thread safety (the engine itself assumes
/// single-writer placements), and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - Languages are loaded from `./data` via `PUT /v1/load_languages`.
/// - Settings are currently the defaults and should be made configurable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = SharedData {
		engine: TokenEngine::new(Settings::default(), LanguageRegistry::new()),
	};
	let shared_engine = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_engine.clone())
			.service(get_generated)
			.service(get_languages)
			.service(put_languages)
			.service(get_loaded_languages)
			.service(post_place)
			.service(post_reset)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
