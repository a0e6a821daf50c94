//! Server-rendered chat page.
//!
//! The page shows the transcript of the session named in the query string
//! and posts new messages to `/api/chat`. Replies are appended in place by a
//! small inline script; reloading re-renders the full transcript.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::llm::{Message, Role};

/// Generate the HTML shell for the application.
pub fn html_shell(title: &str, content: &str) -> String {
    let title = encode_text(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f6f7f9; color: #1d2330; }}
        main {{ max-width: 48rem; margin: 0 auto; padding: 1.5rem; }}
        .transcript {{ display: flex; flex-direction: column; gap: .75rem; margin: 1.5rem 0; }}
        .msg {{ padding: .75rem 1rem; border-radius: .75rem; white-space: pre-wrap; }}
        .msg-user {{ align-self: flex-end; background: #2f6fed; color: #fff; }}
        .msg-assistant {{ align-self: flex-start; background: #fff; box-shadow: 0 1px 2px rgba(0,0,0,.08); }}
        .msg-error {{ align-self: stretch; background: #fde8e8; color: #8a1c1c; }}
        form {{ display: flex; gap: .5rem; }}
        textarea {{ flex: 1; min-height: 2.75rem; padding: .6rem .8rem; border-radius: .6rem; border: 1px solid #cfd4dc; resize: vertical; }}
        button {{ padding: 0 1.2rem; border: 0; border-radius: .6rem; background: #2f6fed; color: #fff; cursor: pointer; }}
        #thinking {{ color: #6b7280; font-style: italic; }}
    </style>
</head>
<body>
    <main>
        {content}
    </main>
</body>
</html>"#
    )
}

/// Render one transcript entry.
fn render_message(message: &Message) -> String {
    let class = match message.role {
        Role::User => "msg msg-user",
        Role::Assistant => "msg msg-assistant",
    };
    format!(
        r#"<div class="{class}">{}</div>"#,
        encode_text(&message.content)
    )
}

/// Chat page content: heading, transcript so far, and the input form.
pub fn chat_page(title: &str, session_id: &str, history: &[Message]) -> String {
    let transcript: String = history.iter().map(render_message).collect();
    let heading = encode_text(title);
    let session_attr = encode_double_quoted_attribute(session_id);

    let content = format!(
        r#"
        <h1>&#x1FA7A; {heading}</h1>
        <p>Ask health questions or book a medical appointment.</p>

        <div id="transcript" class="transcript" data-session-id="{session_attr}">{transcript}</div>
        <p id="thinking" hidden>Thinking...</p>

        <form id="chat-form">
            <textarea name="message" placeholder="Type your message here..." required></textarea>
            <button type="submit">Send</button>
        </form>

        <script>
        (() => {{
            const form = document.getElementById('chat-form');
            const transcript = document.getElementById('transcript');
            const thinking = document.getElementById('thinking');
            const input = form.querySelector('[name=message]');

            const append = (cls, text) => {{
                const div = document.createElement('div');
                div.className = 'msg ' + cls;
                div.textContent = text;
                transcript.appendChild(div);
            }};

            input.addEventListener('keydown', (e) => {{
                if (e.key === 'Enter' && !e.shiftKey) {{
                    e.preventDefault();
                    form.requestSubmit();
                }}
            }});

            form.addEventListener('submit', async (e) => {{
                e.preventDefault();
                const message = input.value;
                if (!message.trim()) return;

                append('msg-user', message);
                input.value = '';
                thinking.hidden = false;

                try {{
                    const resp = await fetch('/api/chat', {{
                        method: 'POST',
                        headers: {{ 'Content-Type': 'application/json' }},
                        body: JSON.stringify({{ message, session_id: transcript.dataset.sessionId }}),
                    }});
                    const body = await resp.json().catch(() => ({{}}));
                    if (!resp.ok) {{
                        append('msg-error', body.error || ('Request failed: ' + resp.status));
                        return;
                    }}
                    transcript.dataset.sessionId = body.session_id;
                    history.replaceState(null, '', '/?session_id=' + encodeURIComponent(body.session_id));
                    append('msg-assistant', body.reply);
                }} catch (err) {{
                    append('msg-error', 'Request failed: ' + err);
                }} finally {{
                    thinking.hidden = true;
                }}
            }});
        }})();
        </script>
    "#
    );

    html_shell(title, &content)
}
