use serde::{Deserialize, Serialize};
use shelfdb::{FacadeLogger, Options, Store};
use std::process;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    city: String,
    state: String,
    country: String,
    pincode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct User {
    name: String,
    age: u32,
    contact: String,
    company: String,
    address: Address,
}

fn employee(name: &str, contact: &str, company: &str, city: &str) -> User {
    User {
        name: name.to_string(),
        age: 23,
        contact: contact.to_string(),
        company: company.to_string(),
        address: Address {
            city: city.to_string(),
            state: "Rajasthan".to_string(),
            country: "india".to_string(),
            pincode: "410063".to_string(),
        },
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> shelfdb::Result<()> {
    let data_dir = std::env::var("SHELFDB_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    log::info!("Opening store at: {data_dir}");
    let db = Store::open(
        &data_dir,
        Options::default().with_logger(Arc::new(FacadeLogger)),
    )?;

    let employees = [
        employee("Jhon", "233364456", "Cuddle", "bikaner"),
        employee("ramesh", "233364478", "hug", "jaipur"),
        employee("mukesh", "973364456", "monk", "udaipur"),
        employee("rajesh", "800364456", "carlos", "jhalor"),
        employee("ravi", "123464456", "dingling", "jodhpur"),
        employee("rahul", "567364456", "magnus", "bikaner"),
    ];

    for user in &employees {
        db.write("users", &user.name, user)?;
    }
    log::info!("Seeded {} users", employees.len());

    let records = db.read_all("users")?;
    for record in &records {
        print!("{}", String::from_utf8_lossy(record));
    }

    let mut all_users = Vec::with_capacity(records.len());
    for record in &records {
        match serde_json::from_slice::<User>(record) {
            Ok(user) => all_users.push(user),
            Err(e) => log::warn!("Skipping unreadable record: {e}"),
        }
    }
    println!("{all_users:#?}");

    Ok(())
}
