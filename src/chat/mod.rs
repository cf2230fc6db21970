//! Chatbot de admisiones: respuestas fijas por palabra clave.

use chrono::Utc;
use uuid::Uuid;

use crate::models::{ChatMessage, ChatRole};

const ADMISSION_REPLY: &str = "For admission to FAST University, you need to:\n\n\
1. Pass the FAST Entry Test (NET)\n\
2. Have a minimum of 60% marks in FSc/A-Levels\n\
3. Submit your application before the deadline\n\n\
The entry test covers English, Mathematics, and IQ/Analytical sections. \
Would you like more details about any specific requirement?";

const ENTRY_TEST_REPLY: &str = "The FAST National Entry Test (NET) is conducted multiple times a year:\n\n\
- **Test Dates**: Usually in June-July and December-January\n\
- **Duration**: 2 hours\n\
- **Sections**: English, Mathematics, IQ/Analytical\n\
- **Format**: MCQs (100 questions)\n\n\
Would you like to start practicing with our test preparation module?";

const FEE_REPLY: &str = "The fee structure at FAST varies by program:\n\n\
- **BS Programs**: ~PKR 180,000-220,000 per semester\n\
- **MS Programs**: ~PKR 200,000-250,000 per semester\n\
- **PhD Programs**: ~PKR 150,000-180,000 per semester\n\n\
Scholarships are available based on merit and need. Would you like information about financial aid?";

const CAMPUS_REPLY: &str = "FAST has campuses in major cities across Pakistan:\n\n\
1. **Islamabad** - Main campus\n\
2. **Lahore** - Faisal Town\n\
3. **Karachi** - FAST-NUCES\n\
4. **Peshawar** - Near GT Road\n\
5. **Chiniot-Faisalabad**\n\n\
Each campus offers state-of-the-art facilities. Would you like to take a virtual tour?";

const PROGRAM_REPLY: &str = "FAST offers a variety of undergraduate and graduate programs:\n\n\
**Undergraduate:**\n\
- BS Computer Science\n\
- BS Software Engineering\n\
- BS Data Science\n\
- BS Artificial Intelligence\n\
- BS Electrical Engineering\n\
- BS Business Administration\n\n\
**Graduate:**\n\
- MS Computer Science\n\
- MS Data Science\n\
- MBA\n\n\
Which program interests you?";

const FALLBACK_REPLY: &str = "That's a great question! I'd be happy to help you with information about FAST University. \
Could you please be more specific about what you'd like to know? I can help with:\n\n\
- Admission requirements\n\
- Entry test details\n\
- Fee structure\n\
- Campus information\n\
- Available programs\n\
- Scholarships";

/// Reglas en orden de prioridad: la primera que coincide gana.
const RULES: &[(&[&str], &str)] = &[
    (&["admission", "requirement"], ADMISSION_REPLY),
    (&["entry test", "net"], ENTRY_TEST_REPLY),
    (&["fee", "cost"], FEE_REPLY),
    (&["campus", "location"], CAMPUS_REPLY),
    (&["program", "course"], PROGRAM_REPLY),
];

/// Canned answer for `message`. Matching is a case-insensitive substring test.
pub fn reply_for(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(FALLBACK_REPLY)
}

pub fn assistant_message(user_message: &str) -> ChatMessage {
    ChatMessage {
        id: Uuid::new_v4().to_string(),
        role: ChatRole::Assistant,
        content: reply_for(user_message).to_string(),
        timestamp: Utc::now(),
    }
}
