use colored::Colorize;
use dohmane::prelude::*;
use log::LevelFilter;

fn init_logging() {
    fern::Dispatch::new()
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => "ERROR".red(),
                log::Level::Warn => "WARN".yellow(),
                log::Level::Info => "INFO".green(),
                log::Level::Debug => "DEBUG".blue(),
                log::Level::Trace => "TRACE".normal(),
            };
            out.finish(format_args!("[{level}] {} - {message}", record.target()))
        })
        .level(LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()
        .expect("logger already initialized");
}

/// Walks an Account/Campaign/Ad hierarchy through the store's full accessor
/// algebra: load a baseline, stage edits, accept a server-assigned primary
/// key (cascading the rewrite to every descendant's foreign key), then
/// delete and confirm the deletion (cascading again).
fn main() {
    init_logging();

    let registry = make_registry([
        Typedef::new("Account", path(["id"]))
            .with_inverse_foreign_key("Campaign", path(["account_id"])),
        Typedef::new("Campaign", path(["id"]))
            .with_foreign_key("Account", path(["account_id"]))
            .with_inverse_foreign_key("Ad", path(["campaign_id"])),
        Typedef::new("Ad", path(["id"])).with_foreign_key("Campaign", path(["campaign_id"])),
    ]);

    let account = registry.entity_type("Account").unwrap();
    let campaign = registry.entity_type("Campaign").unwrap();
    let ad = registry.entity_type("Ad").unwrap();

    let store = Store::new();

    log::info!("creating a new account and a campaign under it");
    let (store, _record, account_pk) = account.current().create(&store, None).unwrap();
    let campaign_record = Record::from(serde_json::json!({ "name": "Launch", "account_id": account_pk.as_int() }));
    let (store, _record, campaign_pk) = campaign.current().create(&store, Some(campaign_record)).unwrap();
    log::info!(
        "staged account {:?}, campaign {:?} (account_id={:?})",
        account_pk,
        campaign_pk,
        account_pk
    );

    log::info!("accepting a server-assigned primary key for the account");
    let server_account = Record::from(serde_json::json!({ "id": 5, "name": "A" }));
    let store = account.current().accept(&store, &account_pk, server_account).unwrap();

    let campaigns = campaign.current().get_all(&store);
    let rewritten = campaigns.get(&campaign_pk).expect("campaign survives the cascade");
    log::info!("campaign's account_id after cascade: {:?}", rewritten.get("account_id"));
    assert_eq!(rewritten.get("account_id"), Some(&Value::Int(5)));

    log::info!("loading an ad under the campaign, then deleting the whole chain");
    let ad_record = Record::from(serde_json::json!({ "id": 9, "campaign_id": campaign_pk.as_int() }));
    let store = ad.initial().load(&store, [ad_record]).unwrap();

    let store = account.current().delete(&store, &Value::Int(5)).unwrap();
    let store = account.deleted().accept(&store, &Value::Int(5)).unwrap();

    for (type_name, entity_type) in [("Account", &account), ("Campaign", &campaign), ("Ad", &ad)] {
        let remaining = entity_type.current().get_all(&store).len();
        log::info!("{type_name}: {remaining} record(s) remain in current");
        assert_eq!(remaining, 0);
    }

    log::info!("done");
}
