use envsync_envfile::{load_file_into_env, read_env_file, write_env_file, EnvParam};
use envsync_store::{NormalizedParam, ParamType};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[tokio::test]
async fn written_file_reads_back() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("params").join("prod").join("api.env");
    let params = vec![
        EnvParam::new("DB_HOST", "db1"),
        EnvParam::new("DB_PASSWORD", "hunter2").encrypted(true),
    ];

    let text = write_env_file(&params, &path).await.expect("write");
    assert_eq!(text, "DB_HOST=db1\nDB_PASSWORD=hunter2 # encrypted");

    let read = read_env_file(&path).await.expect("read");
    assert_eq!(read, params);
}

#[tokio::test]
async fn missing_file_reports_path() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("absent.env");
    let err = read_env_file(&path).await.unwrap_err();
    assert!(err.to_string().contains("absent.env"), "unexpected error: {err}");
}

#[tokio::test]
async fn hand_written_file_drops_noise() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join(".env");
    tokio::fs::write(
        &path,
        "# service config\nDB_HOST=db1\n\nBROKEN LINE\nQUERY=a=b\nTOKEN = xyz # ENCRYPTED\n",
    )
    .await
    .expect("write fixture");

    let read = read_env_file(&path).await.expect("read");
    assert_eq!(
        read,
        vec![
            EnvParam::new("DB_HOST", "db1"),
            EnvParam::new("TOKEN", "xyz").encrypted(true),
        ]
    );
}

#[test]
fn normalized_params_convert_with_secret_flag() {
    let param = NormalizedParam {
        name: "TOKEN".to_string(),
        full_name: "/org/prod/api/TOKEN".to_string(),
        value: "xyz".to_string(),
        version: 4,
        last_modified_ms: 0,
        param_type: ParamType::Secret,
        is_encrypted: true,
    };
    let env = EnvParam::from(&param);
    assert_eq!(env, EnvParam::new("TOKEN", "xyz").encrypted(true));

    let write = env.into_write(true);
    assert_eq!(write.param_type, ParamType::Secret);
    assert!(write.overwrite);
}

#[tokio::test]
async fn file_params_land_in_process_env() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("load.env");
    std::fs::write(
        &path,
        "ENVSYNC_LOAD_TEST_HOST=db1\nnot a param\nENVSYNC_LOAD_TEST_TOKEN=abc # encrypted\n",
    )
    .expect("write");

    let loaded = load_file_into_env(&path).await.expect("load");
    assert_eq!(loaded.len(), 2);
    assert!(loaded[1].is_encrypted);
    assert_eq!(std::env::var("ENVSYNC_LOAD_TEST_HOST").as_deref(), Ok("db1"));
    assert_eq!(std::env::var("ENVSYNC_LOAD_TEST_TOKEN").as_deref(), Ok("abc"));
}

#[tokio::test]
async fn loading_missing_file_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    assert!(load_file_into_env(temp.path().join("absent.env")).await.is_err());
}
