// End-to-end tests of a control session over an in-memory pipe, with real
// loopback sockets for the data connections.

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::constants::MAX_COMMAND_LINE;
    use crate::core_log::audit::{AuditSink, CommandLog};
    use crate::core_network::network::{handle_connection, serve};
    use crate::core_vfs::{FsNode, Vfs};
    use crate::server::ServerState;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::{Arc, Mutex};
    use tokio::io::{
        AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream, ReadHalf, WriteHalf,
    };
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[derive(Clone, Default)]
    struct MemoryAuditLog(Arc<Mutex<Vec<CommandLog>>>);

    impl AuditSink for MemoryAuditLog {
        fn record(&self, entry: &CommandLog) {
            self.0.lock().unwrap().push(entry.clone());
        }
    }

    impl MemoryAuditLog {
        fn entries(&self) -> Vec<CommandLog> {
            self.0.lock().unwrap().clone()
        }
    }

    fn test_vfs() -> Vfs {
        Vfs::new(FsNode::directory(
            "/",
            vec![
                FsNode::directory(
                    "documents",
                    vec![
                        FsNode::directory("records", vec![FsNode::file("ledger.pdf", 420)]),
                        FsNode::file("notes.txt", 69),
                    ],
                ),
                FsNode::directory("pictures", vec![]),
                FsNode::file("readme.txt", 6969),
            ],
        ))
    }

    fn test_state() -> (Arc<ServerState>, MemoryAuditLog) {
        let mut config = Config::default();
        config.server.pasv_bind_address = LOOPBACK;
        let audit = MemoryAuditLog::default();
        let state = ServerState::new(config, test_vfs(), Box::new(audit.clone()));
        (Arc::new(state), audit)
    }

    struct Client {
        reader: BufReader<ReadHalf<DuplexStream>>,
        writer: WriteHalf<DuplexStream>,
        task: JoinHandle<anyhow::Result<()>>,
    }

    impl Client {
        async fn connect(state: Arc<ServerState>) -> (Client, String) {
            let (client, server) = tokio::io::duplex(8192);
            let peer: SocketAddr = "198.51.100.23:50000".parse().unwrap();
            let task = tokio::spawn(handle_connection(server, peer, state));
            let (reader, writer) = tokio::io::split(client);
            let mut client = Client {
                reader: BufReader::new(reader),
                writer,
                task,
            };
            let banner = client.read_reply().await;
            (client, banner)
        }

        async fn send(&mut self, line: &str) {
            self.writer
                .write_all(format!("{}\r\n", line).as_bytes())
                .await
                .unwrap();
        }

        async fn read_reply(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).await.unwrap();
            assert!(line.ends_with("\r\n"), "reply not CRLF terminated: {:?}", line);
            line.trim_end().to_string()
        }

        async fn command(&mut self, line: &str) -> String {
            self.send(line).await;
            self.read_reply().await
        }
    }

    fn pasv_port(reply: &str) -> u16 {
        let inner = &reply[reply.find('(').unwrap() + 1..reply.find(')').unwrap()];
        let parts: Vec<u16> = inner.split(',').map(|p| p.parse().unwrap()).collect();
        assert_eq!(&parts[..4], &[127, 0, 0, 1]);
        parts[4] * 256 + parts[5]
    }

    fn epsv_port(reply: &str) -> u16 {
        reply
            .trim_end_matches(')')
            .trim_end_matches('|')
            .rsplit('|')
            .next()
            .unwrap()
            .parse()
            .unwrap()
    }

    async fn read_all(mut stream: TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_banner_and_basic_replies() {
        let (state, _) = test_state();
        let (mut client, banner) = Client::connect(state).await;
        assert!(banner.starts_with("220 Welcome to the file server"));

        assert_eq!(client.command("USER root").await, "331 Username OK, need password.");
        assert_eq!(client.command("PASS hunter2").await, "230 Login successful.");
        assert_eq!(client.command("SYST").await, "215 UNIX Type: L8");
        assert_eq!(client.command("TYPE I").await, "200 Switching to Binary mode.");
        assert_eq!(client.command("type a").await, "200 OK");
        assert_eq!(client.command("FEAT").await, "502 Command not implemented.");
        assert_eq!(client.command("STOR evil.sh").await, "502 Command not implemented.");
    }

    #[tokio::test]
    async fn test_multi_line_banner() {
        let mut config = Config::default();
        config.server.welcome_message = String::from("Ready.");
        let mut state = ServerState::new(config, test_vfs(), Box::new(MemoryAuditLog::default()));
        state.banner = vec![String::from("Authorized use only."), String::from("Activity is logged.")];

        let (mut client, first) = Client::connect(Arc::new(state)).await;
        assert_eq!(first, "220-Authorized use only.");
        assert_eq!(client.read_reply().await, "220-Activity is logged.");
        assert_eq!(client.read_reply().await, "220 Ready.");
    }

    #[tokio::test]
    async fn test_blank_lines_are_ignored() {
        let (state, audit) = test_state();
        let (mut client, _) = Client::connect(state).await;
        client.send("").await;
        client.send("   ").await;
        assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
        assert_eq!(audit.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_cwd_navigation() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        assert_eq!(
            client.command("CWD /documents/nonexistent").await,
            "550 Failed to change directory."
        );
        assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");

        assert_eq!(client.command("CWD documents").await, "250 Directory successfully changed.");
        assert_eq!(client.command("CWD ./records/").await, "250 Directory successfully changed.");
        assert_eq!(
            client.command("PWD").await,
            "257 \"/documents/records\" is the current directory."
        );

        // a file is not a directory
        assert_eq!(
            client.command("CWD /documents/notes.txt").await,
            "550 Failed to change directory."
        );
        assert_eq!(
            client.command("PWD").await,
            "257 \"/documents/records\" is the current directory."
        );

        assert_eq!(client.command("CWD ..").await, "250 Directory successfully changed.");
        assert_eq!(client.command("PWD").await, "257 \"/documents\" is the current directory.");

        assert_eq!(client.command("CWD ../../..").await, "250 Directory successfully changed.");
        assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");

        // lookups are case-sensitive
        assert_eq!(client.command("CWD /Documents").await, "550 Failed to change directory.");
    }

    #[tokio::test]
    async fn test_pasv_then_list_root() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let reply = client.command("PASV").await;
        assert!(reply.starts_with("227 Entering Passive Mode ("), "{}", reply);
        assert!(reply.ends_with(")."));
        let data = TcpStream::connect((LOOPBACK, pasv_port(&reply))).await.unwrap();

        assert_eq!(
            client.command("LIST").await,
            "150 Opening data connection for directory list."
        );
        let listing = String::from_utf8(read_all(data).await).unwrap();
        assert_eq!(client.read_reply().await, "226 Directory send OK.");

        let lines: Vec<&str> = listing.split("\r\n").filter(|l| !l.is_empty()).collect();
        assert_eq!(
            lines,
            vec![
                "drwxr-xr-x 1 ftp ftp            0 Jan 01 00:00 documents",
                "drwxr-xr-x 1 ftp ftp            0 Jan 01 00:00 pictures",
                "-rw-r--r-- 1 ftp ftp         6969 Jan 01 00:00 readme.txt",
            ]
        );

        // the passive listener was one-shot
        assert_eq!(client.command("LIST").await, "425 Use PASV or PORT/EPRT first.");
    }

    #[tokio::test]
    async fn test_list_without_data_channel() {
        let (state, audit) = test_state();
        let (mut client, _) = Client::connect(state).await;
        assert_eq!(client.command("LIST").await, "425 Use PASV or PORT/EPRT first.");
        assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");

        let commands: Vec<String> = audit.entries().into_iter().map(|e| e.command).collect();
        assert_eq!(commands, vec!["LIST", "PWD"]);
    }

    #[tokio::test]
    async fn test_second_pasv_closes_first_listener() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let first = pasv_port(&client.command("PASV").await);
        let second = pasv_port(&client.command("PASV").await);
        if first != second {
            assert!(TcpStream::connect((LOOPBACK, first)).await.is_err());
        }

        let data = TcpStream::connect((LOOPBACK, second)).await.unwrap();
        client.command("CWD /documents").await;
        assert_eq!(
            client.command("LIST").await,
            "150 Opening data connection for directory list."
        );
        let listing = String::from_utf8(read_all(data).await).unwrap();
        assert_eq!(client.read_reply().await, "226 Directory send OK.");
        assert!(listing.contains(" records\r\n"));
        assert!(listing.contains("          69 Jan 01 00:00 notes.txt\r\n"));
    }

    #[tokio::test]
    async fn test_epsv_retr_returns_fixed_payload() {
        let (state, _) = test_state();
        let expected = state.payload.clone();
        let (mut client, _) = Client::connect(state).await;

        for path in ["readme.txt", "/documents/records/ledger.pdf", "readme.txt"] {
            let reply = client.command("EPSV").await;
            assert!(reply.starts_with("229 Entering Extended Passive Mode (|||"), "{}", reply);
            let data = TcpStream::connect((LOOPBACK, epsv_port(&reply))).await.unwrap();

            assert_eq!(
                client.command(&format!("RETR {}", path)).await,
                "150 Opening data connection for file transfer."
            );
            assert_eq!(read_all(data).await, expected);
            assert_eq!(client.read_reply().await, "226 Transfer complete.");
        }
    }

    #[tokio::test]
    async fn test_port_dials_client_for_retr() {
        let (state, _) = test_state();
        let expected = state.payload.clone();
        let (mut client, _) = Client::connect(state).await;

        let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let receiver = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            read_all(stream).await
        });

        let reply = client
            .command(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .await;
        assert_eq!(reply, "200 PORT command successful.");
        assert_eq!(
            client.command("RETR documents/notes.txt").await,
            "150 Opening data connection for file transfer."
        );
        assert_eq!(client.read_reply().await, "226 Transfer complete.");
        assert_eq!(receiver.await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_eprt_dials_client_for_list() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let receiver = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            read_all(stream).await
        });

        let reply = client.command(&format!("EPRT |1|127.0.0.1|{}|", port)).await;
        assert_eq!(reply, "200 EPRT command successful.");
        client.command("CWD /pictures").await;
        assert_eq!(
            client.command("LIST").await,
            "150 Opening data connection for directory list."
        );
        assert_eq!(client.read_reply().await, "226 Directory send OK.");
        // an empty directory lists nothing
        assert!(receiver.await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retr_path_errors_leave_channel_pending() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let port = pasv_port(&client.command("PASV").await);
        assert_eq!(client.command("RETR nope.txt").await, "550 File not found.");
        assert_eq!(client.command("RETR documents").await, "550 File not found.");
        assert_eq!(client.command("RETR").await, "550 File not found.");

        // the listener is still waiting for its one connection
        let data = TcpStream::connect((LOOPBACK, port)).await.unwrap();
        assert_eq!(
            client.command("RETR readme.txt").await,
            "150 Opening data connection for file transfer."
        );
        assert!(!read_all(data).await.is_empty());
        assert_eq!(client.read_reply().await, "226 Transfer complete.");
    }

    #[tokio::test]
    async fn test_malformed_active_arguments() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let syntax = "501 Syntax error in parameters or arguments.";
        assert_eq!(client.command("PORT 127,0,0,1,4").await, syntax);
        assert_eq!(client.command("PORT a,b,c,d,e,f").await, syntax);
        assert_eq!(client.command("EPRT |1|127.0.0.1").await, syntax);
        assert_eq!(client.command("EPRT").await, syntax);
        assert_eq!(client.command("RETR readme.txt").await, "425 Use PASV or PORT/EPRT first.");
    }

    #[tokio::test]
    async fn test_malformed_port_keeps_previous_channel() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let port = pasv_port(&client.command("PASV").await);
        client.command("PORT 1,2,3").await;
        let data = TcpStream::connect((LOOPBACK, port)).await.unwrap();
        assert_eq!(
            client.command("LIST").await,
            "150 Opening data connection for directory list."
        );
        read_all(data).await;
        assert_eq!(client.read_reply().await, "226 Directory send OK.");
    }

    #[tokio::test]
    async fn test_unreachable_active_target() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let unused = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
        let port = unused.local_addr().unwrap().port();
        drop(unused);

        client
            .command(&format!("PORT 127,0,0,1,{},{}", port / 256, port % 256))
            .await;
        assert_eq!(client.command("LIST").await, "425 Can't open data connection.");
        // the session carries on
        assert_eq!(client.command("SYST").await, "215 UNIX Type: L8");
    }

    #[tokio::test]
    async fn test_retr_joins_leading_slash_onto_cwd() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        assert_eq!(
            client.command("CWD documents").await,
            "250 Directory successfully changed."
        );
        // "/readme.txt" names /documents/readme.txt here, which does not exist
        assert_eq!(client.command("RETR /readme.txt").await, "550 File not found.");

        let port = pasv_port(&client.command("PASV").await);
        let data = TcpStream::connect((LOOPBACK, port)).await.unwrap();
        assert_eq!(
            client.command("RETR /notes.txt").await,
            "150 Opening data connection for file transfer."
        );
        assert!(!read_all(data).await.is_empty());
        assert_eq!(client.read_reply().await, "226 Transfer complete.");
    }

    #[tokio::test]
    async fn test_failed_pasv_drops_previous_active_target() {
        let mut config = Config::default();
        // TEST-NET-1, never assigned to a local interface
        config.server.pasv_bind_address = "192.0.2.77".parse().unwrap();
        let state = ServerState::new(config, test_vfs(), Box::new(MemoryAuditLog::default()));
        let (mut client, _) = Client::connect(Arc::new(state)).await;

        assert_eq!(
            client.command("PORT 127,0,0,1,4,56").await,
            "200 PORT command successful."
        );
        assert_eq!(client.command("PASV").await, "425 Can't open passive connection.");
        assert_eq!(client.command("EPSV").await, "425 Can't open passive connection.");
        assert_eq!(client.command("LIST").await, "425 Use PASV or PORT/EPRT first.");
    }

    #[tokio::test]
    async fn test_oversized_command_line_ends_session() {
        let (state, audit) = test_state();
        let (mut client, _) = Client::connect(state).await;

        let flood = vec![b'A'; MAX_COMMAND_LINE + 904];
        client.writer.write_all(&flood).await.unwrap();
        assert_eq!(client.read_reply().await, "500 Command line too long.");

        assert!(client.task.await.unwrap().is_ok());
        assert!(audit.entries().is_empty());
    }

    #[tokio::test]
    async fn test_command_line_at_limit_is_accepted() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;

        // "CWD " + padding + "\r\n" fills the limit exactly
        let padding = "x".repeat(MAX_COMMAND_LINE - 6);
        assert_eq!(
            client.command(&format!("CWD {}", padding)).await,
            "550 Failed to change directory."
        );
        assert_eq!(client.command("PWD").await, "257 \"/\" is the current directory.");
    }

    #[tokio::test]
    async fn test_audit_records_before_execution() {
        let (state, audit) = test_state();
        let (mut client, _) = Client::connect(state).await;

        client.command("cwd documents").await;
        client.command("PWD").await;
        client.command("RETR  spaced name.txt").await;

        let entries = audit.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].ip, "198.51.100.23:50000");
        assert_eq!(entries[0].command, "CWD");
        assert_eq!(entries[0].argument, "documents");
        assert_eq!(entries[0].cwd, "/");
        assert_eq!(entries[1].command, "PWD");
        assert_eq!(entries[1].argument, "");
        assert_eq!(entries[1].cwd, "/documents");
        // only the first whitespace splits the command from its argument
        assert_eq!(entries[2].argument, " spaced name.txt");
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;
        client.command("PASV").await;
        assert_eq!(client.command("QUIT").await, "221 Goodbye.");

        assert!(client.task.await.unwrap().is_ok());
        let mut rest = String::new();
        assert_eq!(client.reader.read_line(&mut rest).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_client_disconnect_ends_session() {
        let (state, _) = test_state();
        let (mut client, _) = Client::connect(state).await;
        client.command("PWD").await;
        client.writer.shutdown().await.unwrap();
        drop(client.writer);
        assert!(client.task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_acceptor_serves_tcp_clients() {
        let (state, _) = test_state();
        let listener = TcpListener::bind((LOOPBACK, 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, state));

        for _ in 0..2 {
            let stream = TcpStream::connect(addr).await.unwrap();
            let (reader, mut writer) = stream.into_split();
            let mut reader = BufReader::new(reader);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            assert!(line.starts_with("220 "));

            writer.write_all(b"QUIT\r\n").await.unwrap();
            line.clear();
            reader.read_line(&mut line).await.unwrap();
            assert_eq!(line, "221 Goodbye.\r\n");
        }

        server.abort();
    }
}
