// Prompt templates for the generation services.
// Placeholders are `{name}` and are filled with `str::replace` before sending.

pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Enhance this apprenticeship program for employer matching and strategic planning.

Program Title: {title}
Region: {region}
Industries: {industries}
URL: {url}

PROVIDED CONTACT DETAILS (keep these unless the URL shows more accurate ones):
- Name: {contact_name}
- Email: {contact_email}
- Phone: {contact_phone}

TASKS:
1. Write a compelling two-sentence elevator pitch.
2. Give geographic and economic analytics for {region}: labor market trends, key employers, growth.
3. Determine a realistic wage range for this region and industry.
4. If a URL is provided, find the primary contact (name, email, phone) there; otherwise use the provided details.
5. If a URL is provided, summarize the program page in a concise one-page style.
6. Assess whether safety training or compliance (OSHA etc.) is likely involved.
7. List target job titles, hard skills and soft skills.
8. Give three strategic suggestions."#;

pub const DISCOVERY_PROMPT_TEMPLATE: &str = r#"Based on this apprenticeship profile:
- Title: {title}
- Industries: {industries}
- Region: {region}
- Target Job Titles: {job_titles}

Propose EXACTLY {count} real or highly representative employer targets in this region.
Score each 0-100 using: industry alignment (30%), job title overlap (25%), skill overlap (25%),
geographic proximity (10%), hiring signals (10%). Report each sub-score 0-100 as well.
Assign each an outreach segment from: {segments}.
Employer names must be unique. Include website, phone and a generic contact email when known."#;

pub const OUTREACH_PROMPT_TEMPLATE: &str = r#"Generate a tailored outreach package for {employer} for the {title} apprenticeship program.
Segment focus: {segment}.
Region: {region}.
CTA: {cta}.
Include one primary email, three follow-ups, a phone call script and a personal LinkedIn message (DM/InMail style).
Always include the mandatory disclaimer: "{disclaimer}""#;

pub const LINKEDIN_PROMPT_TEMPLATE: &str = r#"Generate exactly {count} fresh, unique LinkedIn posts written for AN EMPLOYER AUDIENCE, recruiting them into the {title} apprenticeship program.
Uniqueness seed: {seed}.
Focus on ROI, filling skills gaps and simplifying their hiring pipeline, in a professional partnership-oriented tone.

IMPORTANT: include this link naturally in the text of every post: {cta}

Rotate these pillars across the posts:
{pillars}

Give each post 3-5 relevant hashtags."#;

pub const GRAPHIC_PROMPT_TEMPLATE: &str = r#"A professional, clean, high-impact LinkedIn post graphic for the theme "{pillar}".
Context: "{excerpt}".
Recruiting employers for a "{title}" apprenticeship program in the "{industries}" industries.
Style: modern corporate photography or high-end professional digital illustration; collaboration, technical excellence, future workforce, economic growth.
Crucial: do not include any text in the image."#;

pub const SPEECH_PROMPT_TEMPLATE: &str =
    "Read the following outreach content professionally and clearly: {text}";

pub const INTAKE_AGENT_SYSTEM_TEMPLATE: &str = r#"You are a conversational intake agent. Your only purpose is to gather the data needed to build an apprenticeship profile.

INTAKE PROTOCOL:
1. Title: informal program name.
2. Region: city or county.
3. Industries: target sectors.
4. Contact: name, email, phone.
5. Program link: official website (optional).

CURRENT PROGRESS: {form}

RULES:
- When the user provides information, call 'collect_intake_data' and ask for the NEXT missing field.
- Never ask for the same thing twice.
- Be punchy and informal. One or two short sentences at most."#;
