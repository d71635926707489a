mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use mockito::Server;
    use predicates::str::contains;
    use tempfile::TempDir;

    use std::fs;
    use std::path::PathBuf;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "urlcheck";

    /// Working directory with a URL list; keeps reports and config lookups out of the repo
    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn new() -> Result<Self, std::io::Error> {
            Ok(Self {
                dir: TempDir::new()?,
            })
        }

        fn write_urls(&self, urls: &[String]) -> Result<PathBuf, std::io::Error> {
            let path = self.dir.path().join("urls.txt");
            fs::write(&path, urls.join("\n"))?;
            Ok(path)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn command(&self) -> Result<Command, Box<dyn std::error::Error>> {
            let mut cmd = Command::cargo_bin(NAME)?;
            cmd.current_dir(self.dir.path()).env("NO_COLOR", "1");
            Ok(cmd)
        }
    }

    fn refused_url() -> Result<String, std::io::Error> {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);
        Ok(format!("http://127.0.0.1:{port}/"))
    }

    #[test]
    fn test_output__when_no_file_provided() -> TestResult {
        let ws = Workspace::new()?;

        ws.command()?
            .assert()
            .success()
            .stdout(contains("No URLs to check."));
        assert!(!ws.path("url_check_results.csv").exists());
        Ok(())
    }

    #[test]
    fn test_output__when_file_has_only_comments() -> TestResult {
        let ws = Workspace::new()?;
        let file = ws.write_urls(&["# nothing here".to_string(), "   ".to_string()])?;

        ws.command()?
            .arg(&file)
            .assert()
            .success()
            .stdout(contains("No URLs to check."));
        Ok(())
    }

    #[test]
    fn test_output__when_file_is_missing() -> TestResult {
        let ws = Workspace::new()?;

        ws.command()?
            .arg(ws.path("missing.txt"))
            .assert()
            .success()
            .stderr(contains("Error loading URLs from file"))
            .stdout(contains("No URLs to check."));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_all_working() -> TestResult {
        let mut server = Server::new_async().await;
        let _head = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/ok", server.url())])?;

        ws.command()?
            .arg(&file)
            .assert()
            .success()
            .stdout(contains("WORKING URLs: 1"))
            .stdout(contains(format!("✓ {}/ok - 200 OK", server.url())))
            .stdout(contains("Total URLs checked: 1"))
            .stdout(contains("Working: 1 (100.0%)"))
            .stdout(contains("Report saved to url_check_results.csv"));

        let csv = fs::read_to_string(ws.path("url_check_results.csv"))?;
        assert!(csv.starts_with(
            "url,status_code,reason,response_time,is_error,error_type,redirected,redirect_url"
        ));
        assert!(csv.contains(&format!("{}/ok,200,OK,", server.url())));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_broken_url() -> TestResult {
        let mut server = Server::new_async().await;
        let _head = server
            .mock("HEAD", "/gone")
            .with_status(404)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/gone", server.url())])?;

        ws.command()?
            .arg(&file)
            .assert()
            .failure()
            .code(1)
            .stdout(contains("BROKEN URLs: 1"))
            .stdout(contains(format!("✗ {}/gone - 404 Not Found", server.url())));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_head_not_allowed_falls_back_to_get() -> TestResult {
        let mut server = Server::new_async().await;
        let head = server
            .mock("HEAD", "/page")
            .with_status(405)
            .expect(1)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/page")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/page", server.url())])?;

        ws.command()?
            .arg(&file)
            .assert()
            .success()
            .stdout(contains("WORKING URLs: 1"));

        head.assert_async().await;
        get.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_mixed_results() -> TestResult {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let _gone = server
            .mock("HEAD", "/gone")
            .with_status(410)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let refused = refused_url()?;
        let file = ws.write_urls(&[
            format!("{}/ok", server.url()),
            format!("{}/gone", server.url()),
            refused.clone(),
        ])?;

        ws.command()?
            .arg(&file)
            .args(["--workers", "2", "--timeout", "5"])
            .assert()
            .failure()
            .code(1)
            .stdout(contains("WORKING URLs: 1"))
            .stdout(contains("BROKEN URLs: 1"))
            .stdout(contains("ERRORS: 1"))
            .stdout(contains(format!("! {refused} - connection_failed")))
            .stdout(contains("Total URLs checked: 3"));

        let csv = fs::read_to_string(ws.path("url_check_results.csv"))?;
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains(",true,connection_failed,"));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__with_json_format() -> TestResult {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/ok", server.url())])?;

        let output = ws.command()?.arg(&file).args(["--format", "json"]).output()?;

        assert!(output.status.success());
        let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(value["total"], 1);
        assert_eq!(value["working"], 1);
        assert_eq!(value["outcomes"][0]["status_code"], 200);
        Ok(())
    }

    #[tokio::test]
    async fn test_output__with_minimal_format() -> TestResult {
        let mut server = Server::new_async().await;
        let _gone = server
            .mock("HEAD", "/gone")
            .with_status(410)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/gone", server.url())])?;

        ws.command()?
            .arg(&file)
            .args(["--format", "minimal"])
            .assert()
            .failure()
            .stdout(format!("410 {}/gone\n", server.url()));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__when_quiet() -> TestResult {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/ok", server.url())])?;

        let assert = ws.command()?.arg(&file).arg("-q").assert().success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone())?;

        assert!(!stdout.contains("WORKING URLs"));
        assert!(!stdout.contains("Checking"));
        assert!(stdout.contains("Total URLs checked: 1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_output__with_custom_output_path() -> TestResult {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/ok", server.url())])?;

        ws.command()?
            .arg(&file)
            .args(["-o", "report.csv"])
            .assert()
            .success();

        assert!(ws.path("report.csv").exists());
        assert!(!ws.path("url_check_results.csv").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_output__with_get_only_host_skips_head() -> TestResult {
        let mut server = Server::new_async().await;
        let head = server
            .mock("HEAD", "/page")
            .with_status(200)
            .expect(0)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/page")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/page", server.url())])?;

        ws.command()?
            .arg(&file)
            .args(["--get-only", "127.0.0.1"])
            .assert()
            .success();

        head.assert_async().await;
        get.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_output__with_config_file() -> TestResult {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("HEAD", "/ok")
            .with_status(200)
            .create_async()
            .await;
        let ws = Workspace::new()?;
        let file = ws.write_urls(&[format!("{}/ok", server.url())])?;
        fs::write(
            ws.path(".urlcheck.toml"),
            "output_format = \"minimal\"\noutput_path = \"from-config.csv\"\n",
        )?;

        ws.command()?
            .arg(&file)
            .assert()
            .success()
            .stdout(format!("200 {}/ok\n", server.url()));
        assert!(ws.path("from-config.csv").exists());

        // --no-config ignores the file in the working directory
        ws.command()?
            .arg(&file)
            .arg("--no-config")
            .assert()
            .success()
            .stdout(contains("===== SUMMARY ====="));
        Ok(())
    }

    #[test]
    fn test_output__when_workers_is_zero() -> TestResult {
        let ws = Workspace::new()?;
        let file = ws.write_urls(&["https://example.test/".to_string()])?;

        ws.command()?
            .arg(&file)
            .args(["--workers", "0"])
            .assert()
            .failure()
            .code(1)
            .stderr(contains("Configuration error"));
        Ok(())
    }

    #[test]
    fn test_output__when_timeout_is_zero() -> TestResult {
        let ws = Workspace::new()?;

        ws.command()?
            .args(["--timeout", "0"])
            .assert()
            .failure()
            .stderr(contains("--timeout"));
        Ok(())
    }

    #[test]
    fn test_output__when_config_file_is_invalid() -> TestResult {
        let ws = Workspace::new()?;
        let config = ws.path("bad.toml");
        fs::write(&config, "timeout = \"soon\"")?;
        let file = ws.write_urls(&["https://example.test/".to_string()])?;

        ws.command()?
            .arg(&file)
            .arg("--config")
            .arg(&config)
            .assert()
            .failure()
            .stderr(contains("Error:"));
        Ok(())
    }

    #[test]
    fn test_output__with_conflicting_tls_flags() -> TestResult {
        let ws = Workspace::new()?;

        ws.command()?
            .args(["--verify-tls", "--insecure"])
            .assert()
            .failure()
            .stderr(contains("cannot be used with"));
        Ok(())
    }
}
